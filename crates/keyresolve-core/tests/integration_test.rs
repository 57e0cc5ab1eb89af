// Keyresolve Integration Tests
//
// These tests verify the complete pipeline:
// layout file -> StaticHost -> table build -> registry queries
//
// Run with: cargo test --test integration_test

mod tests {
    use keyresolve_core::case;
    use keyresolve_core::host::GroupHandle;
    use keyresolve_core::vk::VK_COUNT;
    use keyresolve_core::{
        Group, KeyValue, KeymapRegistry, LayoutFile, ModifierMask, Settings, ShiftLevel,
        StaticHost, Verdict,
    };
    use strum::IntoEnumIterator;

    const LAYOUTS: &str = r#"
[[group]]
name = "us-intl"

[group.keys]
"0x41" = ["a", "A", "", "", "aacute", "Aacute"]
"0x45" = ["e", "E", "", "", "eacute", "Eacute"]
"0x5A" = ["z", "Z"]
"0x31" = ["1", "exclam", "", "", "exclamdown"]
"0x09" = ["Tab"]
"0xDE" = ["dead:acute", "dead:diaeresis"]
"0xC0" = ["dead:grave", "asciitilde"]

[group.compose]
acute = { a = "aacute", A = "Aacute", e = "eacute", E = "Eacute" }
diaeresis = { a = "adiaeresis", e = "ediaeresis" }
grave = { a = "agrave", e = "egrave" }

[[group]]
name = "ru"

[group.keys]
"0x41" = ["U+0444", "U+0424"]
"0x45" = ["U+0443"]
"0x5A" = ["U+044F", "U+042F"]

[[modifier]]
bit = 6
keys = ["0x5B", "0x5C"]
"#;

    fn host() -> StaticHost {
        LayoutFile::from_toml(LAYOUTS).unwrap().into_host()
    }

    fn registry() -> KeymapRegistry<StaticHost> {
        KeymapRegistry::new(host(), Settings::new())
    }

    #[test]
    fn test_total_coverage() {
        let mut registry = registry();
        assert_eq!(registry.group_count(), 2);
        for group in 0..2 {
            let table = registry.table(group).unwrap();
            assert_eq!(table.rows().count(), VK_COUNT);
            for (vk, row) in table.rows() {
                for level in ShiftLevel::iter() {
                    assert_eq!(table.lookup(vk, level), row[level.index()]);
                }
            }
        }
        // the Russian group leaves AltGr levels empty
        assert_eq!(
            registry.lookup_key(1, 0x41, ShiftLevel::AltGr),
            KeyValue::VOID
        );
    }

    #[test]
    fn test_idempotent_rebuild() {
        let mut host = host();
        let first = Group::build(&mut host, GroupHandle(0));
        let second = Group::build(&mut host, GroupHandle(0));
        assert_eq!(first.table(), second.table());
        assert_eq!(first.dead_keys(), second.dead_keys());
        assert_eq!(first.options(), second.options());

        let mut registry = registry();
        let before = registry.table(0).unwrap().clone();
        registry.probe_mut().notifier().notify();
        assert!(registry.refresh());
        assert_eq!(registry.table(0).unwrap(), &before);
    }

    #[test]
    fn test_unconsumed_modifiers_never_change_keyval() {
        let mut registry = registry();
        let bits = [
            ModifierMask::SHIFT,
            ModifierMask::LOCK,
            ModifierMask::ALT_GR,
            ModifierMask::NUM_LOCK,
            ModifierMask::CONTROL,
            ModifierMask::ALT,
        ];
        let states: Vec<ModifierMask> = (0u32..1 << bits.len())
            .map(|combo| {
                bits.iter()
                    .enumerate()
                    .filter(|(i, _)| combo & (1 << i) != 0)
                    .fold(ModifierMask::empty(), |acc, (_, bit)| acc | *bit)
            })
            .collect();

        for group in 0..2 {
            for vk in [0x41, 0x45, 0x5A, 0x31, 0x09, 0xDE, 0x67, 0x6E] {
                for &state in &states {
                    let keyval = |reg: &mut KeymapRegistry<StaticHost>, s| {
                        reg.translate_keyboard_state(vk, s, group)
                            .map(|t| t.keyval)
                            .unwrap_or(KeyValue::VOID)
                    };
                    let Some(t) = registry.translate_keyboard_state(vk, state, group) else {
                        continue;
                    };
                    for bit in bits {
                        if t.consumed_modifiers.contains(bit) {
                            continue;
                        }
                        assert_eq!(
                            keyval(&mut registry, state ^ bit),
                            t.keyval,
                            "vk {:#x} group {} state {} bit {}",
                            vk,
                            group,
                            state,
                            bit
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_case_round_trip() {
        let samples = (0x20u32..0x100)
            .chain(0x1A1..0x1FF)
            .chain(0x6A1..0x6FF)
            .chain(0x7A1..0x7FA)
            .map(KeyValue)
            .chain("ÀÉÎõüĀăĐЖжΣσßÿŸſıςẞ\u{212A}".chars().map(KeyValue::from_unicode));

        for v in samples {
            if !case::has_case_pair(v) {
                continue;
            }
            assert_eq!(case::lower(case::upper(v)), case::lower(v), "{}", v);
            assert_eq!(case::upper(case::lower(v)), case::upper(v), "{}", v);
        }

        // one-way Unicode mappings never claim a pair
        for c in ['ſ', 'ı', 'ς', '\u{212A}', 'ẞ'] {
            assert!(!case::has_case_pair(KeyValue::from_unicode(c)), "{:?}", c);
        }
        assert_eq!(
            case::upper(KeyValue::from_unicode('ÿ')),
            KeyValue::from_unicode('Ÿ')
        );
    }

    #[test]
    fn test_compose_exact() {
        let mut registry = registry();
        let (verdict, output) =
            registry.check_compose(&[KeyValue::DEAD_ACUTE, KeyValue::from_unicode('a')]);
        assert_eq!(verdict, Verdict::Exact);
        assert_eq!(output.as_slice(), &[KeyValue::from_unicode('á')]);
    }

    #[test]
    fn test_compose_graceful_degradation() {
        let mut registry = registry();
        let z = KeyValue::from_unicode('z');
        let (verdict, output) = registry.check_compose(&[KeyValue::DEAD_ACUTE, z]);
        assert_eq!(verdict, Verdict::Partial);
        assert_eq!(output.as_slice(), &[KeyValue::from_unicode('\u{B4}'), z]);

        let (verdict, output) =
            registry.check_compose(&[KeyValue::DEAD_GRAVE, KeyValue::DEAD_ACUTE]);
        assert_eq!(verdict, Verdict::Partial);
        assert_eq!(
            output.as_slice(),
            &[KeyValue::from_unicode('`'), KeyValue::from_unicode('\u{B4}')]
        );
    }

    #[test]
    fn test_compose_in_second_group() {
        let mut registry = registry();
        registry.probe_mut().set_active(1);
        let (verdict, _) = registry.check_compose(&[KeyValue::DEAD_ACUTE]);
        assert_eq!(verdict, Verdict::NoMatch);
    }

    #[test]
    fn test_tab_and_shift_synthesis() {
        let mut registry = registry();
        assert_eq!(
            registry.lookup_key(0, 0x09, ShiftLevel::Shift),
            KeyValue::ISO_LEFT_TAB
        );
        // Cyrillic 'у' has no explicit Shift level
        assert_eq!(
            registry.lookup_key(1, 0x45, ShiftLevel::Shift),
            KeyValue::from_unicode('У')
        );
    }

    #[test]
    fn test_reverse_lookup_order() {
        let mut registry = registry();
        let entries = registry.get_entries_for_keyval(KeyValue::from_unicode('á'));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].vk, 0x41);
        assert_eq!(entries[0].level, ShiftLevel::AltGr);

        let entries = registry.get_entries_for_keycode(0x41);
        let groups: Vec<usize> = entries.iter().map(|e| e.group).collect();
        assert!(groups.windows(2).all(|w| w[0] <= w[1]));
        assert!(entries.iter().all(|e| !e.keyval.is_void()));
    }

    #[test]
    fn test_options_and_virtual_modifiers() {
        let mut registry = registry();
        assert!(registry.group_options(0).unwrap().has_altgr);
        assert!(!registry.group_options(1).unwrap().has_altgr);
        assert_eq!(
            registry.add_virtual_modifiers(ModifierMask::MOD4),
            ModifierMask::MOD4 | ModifierMask::SUPER
        );
        let (_, independent) =
            registry.map_virtual_modifiers(ModifierMask::SUPER | ModifierMask::MOD4);
        assert!(!independent);
    }
}
