// Keyresolve Case Folding
// Upper/lower case conversion over key values

use crate::keyval::KeyValue;

/// One contiguous block of cased key values.
///
/// Upper-case values `upper_start..=upper_end` pair with the lower-case values
/// obtained by adding `delta`. Lower-case values listed in `uncased` have no
/// upper-case partner; neither does the upper value they would pair with.
#[derive(Debug, Clone, Copy)]
struct CaseRange {
    upper_start: u32,
    upper_end: u32,
    delta: i32,
    uncased: &'static [u32],
}

impl CaseRange {
    const fn new(upper_start: u32, upper_end: u32, delta: i32) -> Self {
        Self {
            upper_start,
            upper_end,
            delta,
            uncased: &[],
        }
    }

    const fn with_uncased(self, uncased: &'static [u32]) -> Self {
        Self { uncased, ..self }
    }

    fn shift(value: u32, delta: i32) -> u32 {
        value.wrapping_add_signed(delta)
    }

    fn lower_of(&self, upper: u32) -> Option<u32> {
        if !(self.upper_start..=self.upper_end).contains(&upper) {
            return None;
        }
        let lower = Self::shift(upper, self.delta);
        (!self.uncased.contains(&lower)).then_some(lower)
    }

    fn upper_of(&self, lower: u32) -> Option<u32> {
        let upper = Self::shift(lower, -self.delta);
        if !(self.upper_start..=self.upper_end).contains(&upper) || self.uncased.contains(&lower) {
            return None;
        }
        Some(upper)
    }
}

/// Legacy 8-bit symbol blocks: Latin-1 to Latin-4, Cyrillic and Greek.
const CASE_RANGES: &[CaseRange] = &[
    // Latin-1
    CaseRange::new(0x41, 0x5A, 0x20),
    CaseRange::new(0xC0, 0xD6, 0x20),
    CaseRange::new(0xD8, 0xDE, 0x20),
    // Latin-2
    CaseRange::new(0x1A1, 0x1A1, 0x10),
    CaseRange::new(0x1A3, 0x1A6, 0x10),
    CaseRange::new(0x1A9, 0x1AC, 0x10),
    CaseRange::new(0x1AE, 0x1AF, 0x10),
    CaseRange::new(0x1C0, 0x1DE, 0x20),
    // Latin-3
    CaseRange::new(0x2A1, 0x2A6, 0x10),
    CaseRange::new(0x2AB, 0x2AC, 0x10),
    CaseRange::new(0x2C5, 0x2DE, 0x20),
    // Latin-4
    CaseRange::new(0x3A3, 0x3AC, 0x10),
    CaseRange::new(0x3BD, 0x3BD, 0x02),
    CaseRange::new(0x3C0, 0x3DE, 0x20),
    // Cyrillic
    CaseRange::new(0x6B1, 0x6BF, -0x10),
    CaseRange::new(0x6E0, 0x6FF, -0x20),
    // Greek
    CaseRange::new(0x7A1, 0x7AB, 0x10).with_uncased(&[0x7B6, 0x7BA]),
    CaseRange::new(0x7C1, 0x7D9, 0x20).with_uncased(&[0x7F3]),
];

/// Convert a key value to lower case. Values without a case pair are returned unchanged.
pub fn lower(value: KeyValue) -> KeyValue {
    convert_case(value).0
}

/// Convert a key value to upper case. Values without a case pair are returned unchanged.
pub fn upper(value: KeyValue) -> KeyValue {
    convert_case(value).1
}

/// Compute `(lower, upper)` for a key value.
pub fn convert_case(value: KeyValue) -> (KeyValue, KeyValue) {
    if value.is_unicode() {
        return match value.to_unicode().and_then(unicode_pair) {
            Some((lower, upper)) => (KeyValue::from_unicode(lower), KeyValue::from_unicode(upper)),
            None => (value, value),
        };
    }

    let raw = value.raw();
    let lower = CASE_RANGES.iter().find_map(|range| range.lower_of(raw));
    let upper = CASE_RANGES.iter().find_map(|range| range.upper_of(raw));
    if lower.is_none() && upper.is_none() {
        // Latin-1 values without a legacy partner (ydiaeresis) pair in Unicode
        let latin1_pair = (0xA0..=0xFF)
            .contains(&raw)
            .then(|| char::from_u32(raw))
            .flatten()
            .and_then(unicode_pair);
        if let Some((lower, upper)) = latin1_pair {
            return (KeyValue::from_unicode(lower), KeyValue::from_unicode(upper));
        }
    }
    (
        KeyValue(lower.unwrap_or(raw)),
        KeyValue(upper.unwrap_or(raw)),
    )
}

/// `(lower, upper)` when `c` is one side of a single-scalar case pair that
/// maps back onto itself in both directions.
///
/// One-way mappings (`ſ` → `S`, `ı` → `I`, `ς` → `Σ`, KELVIN SIGN → `k`) and
/// multi-scalar ones (`ß` → `SS`) are not pairs.
fn unicode_pair(c: char) -> Option<(char, char)> {
    let lower = single(c.to_lowercase())?;
    let upper = single(c.to_uppercase())?;
    let round_trips =
        single(upper.to_lowercase()) == Some(lower) && single(lower.to_uppercase()) == Some(upper);
    (lower != upper && round_trips && (c == lower || c == upper)).then_some((lower, upper))
}

fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

pub fn is_upper(value: KeyValue) -> bool {
    let (lower, upper) = convert_case(value);
    value == upper && lower != upper
}

pub fn is_lower(value: KeyValue) -> bool {
    let (lower, upper) = convert_case(value);
    value == lower && lower != upper
}

/// True when the value has distinct case forms
pub fn has_case_pair(value: KeyValue) -> bool {
    let (lower, upper) = convert_case(value);
    lower != upper
}
