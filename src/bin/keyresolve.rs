// Keyresolve CLI
// Inspect resolved layout tables and dead-key composition

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use keyresolve_core::vk;
use keyresolve_core::{
    ComposeMatcher, KeyValue, KeymapRegistry, LayoutFile, ModifierMask, Settings, ShiftLevel,
    StaticHost, Verdict,
};

/// Keyboard layout resolution and dead-key composition
#[derive(Parser, Debug)]
#[command(name = "keyresolve")]
#[command(version)]
#[command(about = "Keyboard layout resolution and dead-key composition", long_about = None)]
struct Args {
    /// Layout description file (can be used multiple times)
    #[arg(short, long, value_name = "FILE", global = true)]
    layout: Vec<PathBuf>,

    /// Settings file (defaults to ~/.config/keyresolve/settings.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the resolved table of one group, or of all groups
    Dump {
        #[arg(short, long)]
        group: Option<usize>,
    },

    /// Translate a virtual key under a modifier state
    Translate {
        /// Virtual key: 0x41, 65 or A
        vk: String,

        /// Modifier list such as shift,lock or ctrl+alt
        #[arg(short, long, default_value = "")]
        mods: String,

        /// Group index (defaults to the active group)
        #[arg(short, long)]
        group: Option<usize>,
    },

    /// Match a key value sequence against the dead-key index
    Compose {
        #[arg(required = true)]
        keyvals: Vec<String>,
    },

    /// Type keys like an input dispatcher, e.g. `0xDD shift+0x45`
    Type {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List every key that types a key value
    Reverse { keyval: String },

    /// List everything a virtual key types
    Keycode { vk: String },

    /// Read commands from stdin; SIGHUP reloads the settings and layout files
    Repl,
}

/// Commands accepted on a REPL line
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

/// Main application state
struct Application {
    registry: KeymapRegistry<StaticHost>,
    layout_paths: Vec<PathBuf>,
    matcher: ComposeMatcher,
}

impl Application {
    fn new(args: &Args) -> Result<Self> {
        let settings = match &args.settings {
            Some(path) => Settings::from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::load_default().context("loading default settings")?,
        };

        let layout_paths = if args.layout.is_empty() {
            settings.layout_files()
        } else {
            args.layout.clone()
        };
        if layout_paths.is_empty() {
            bail!("no layout files: pass --layout or set [layout] files in the settings");
        }

        let host = load_layouts(&layout_paths)?.into_host();
        Ok(Self {
            registry: KeymapRegistry::new(host, settings),
            layout_paths,
            matcher: ComposeMatcher::new(),
        })
    }

    /// Re-read the settings file and the layout files; the host serial bump
    /// makes the next lookup rebuild
    fn reload(&mut self) -> Result<()> {
        if let Some(path) = self.registry.settings().source_path() {
            let mut settings = self.registry.settings().clone();
            settings
                .reload()
                .with_context(|| format!("reloading settings from {}", path.display()))?;
            self.registry.set_settings(settings);
        }

        let file = load_layouts(&self.layout_paths)?;
        let host = self.registry.probe_mut();
        host.replace_groups(file.groups);
        host.set_bindings(file.bindings);
        log::info!("Reloaded {} layout file(s)", self.layout_paths.len());
        Ok(())
    }

    fn run(&mut self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Dump { group } => self.dump(*group, out),
            Command::Translate { vk, mods, group } => self.translate(vk, mods, *group, out),
            Command::Compose { keyvals } => self.compose(keyvals, out),
            Command::Type { keys } => self.type_keys(keys, out),
            Command::Reverse { keyval } => self.reverse(keyval, out),
            Command::Keycode { vk } => self.keycode(vk, out),
            Command::Repl => self.repl(out),
        }
    }

    fn dump(&mut self, group: Option<usize>, out: &mut impl Write) -> Result<()> {
        let count = self.registry.group_count();
        let groups: Vec<usize> = match group {
            Some(index) if index < count => vec![index],
            Some(index) => bail!("group {} out of range ({} group(s))", index, count),
            None => (0..count).collect(),
        };

        for index in groups {
            let name = self
                .registry
                .probe()
                .groups()
                .get(index)
                .map(|g| g.name().to_string())
                .unwrap_or_default();
            let options = self.registry.group_options(index).unwrap_or_default();
            let direction = self.registry.direction(index);
            writeln!(
                out,
                "group {} ({}): altgr={} decimal_mark='{}' direction={}",
                index,
                name,
                options.has_altgr,
                options.decimal_mark,
                direction.map(|d| d.to_string()).unwrap_or_default()
            )?;

            let levels: Vec<String> = (0..ShiftLevel::COUNT as u8)
                .filter_map(ShiftLevel::from_bits)
                .map(|level| level.to_string())
                .collect();
            writeln!(out, "  vk    {}", levels.join(" "))?;

            let Some(table) = self.registry.table(index) else {
                continue;
            };
            for (vk, row) in table.rows() {
                if row.iter().all(|keyval| keyval.is_void()) {
                    continue;
                }
                let cells: Vec<String> = row.iter().map(|keyval| keyval_cell(*keyval)).collect();
                writeln!(out, "  {:#04x}  {}", vk, cells.join(" "))?;
            }
        }
        Ok(())
    }

    fn translate(
        &mut self,
        vk: &str,
        mods: &str,
        group: Option<usize>,
        out: &mut impl Write,
    ) -> Result<()> {
        let vk = parse_vk(vk)?;
        let state = ModifierMask::parse_list(mods).map_err(anyhow::Error::msg)?;
        let group = self.group_or_active(group)?;

        match self.registry.translate_keyboard_state(vk, state, group) {
            Some(t) => writeln!(
                out,
                "{} level={} group={} consumed={}",
                describe(t.keyval),
                t.level,
                t.effective_group,
                t.consumed_modifiers
            )?,
            None => writeln!(out, "nothing")?,
        }
        Ok(())
    }

    fn compose(&mut self, keyvals: &[String], out: &mut impl Write) -> Result<()> {
        let buffer = keyvals
            .iter()
            .map(|name| parse_keyval(name))
            .collect::<Result<Vec<_>>>()?;
        let (verdict, output) = self.registry.check_compose(&buffer);
        writeln!(out, "{} {}", verdict, describe_all(&output))?;
        Ok(())
    }

    fn type_keys(&mut self, keys: &[String], out: &mut impl Write) -> Result<()> {
        let mut typed = Vec::new();
        for key in keys {
            let (state, vk) = parse_key_chord(key)?;
            let group = self.group_or_active(None)?;
            let Some(t) = self.registry.translate_keyboard_state(vk, state, group) else {
                continue;
            };
            match self.matcher.feed(&mut self.registry, t.keyval) {
                (Verdict::NoMatch, _) => typed.push(t.keyval),
                (Verdict::Incomplete, _) => {}
                (_, output) => typed.extend(output),
            }
        }
        writeln!(out, "{}", describe_all(&typed))?;
        if self.matcher.is_pending() {
            writeln!(out, "pending {}", describe_all(self.matcher.pending()))?;
        }
        Ok(())
    }

    fn reverse(&mut self, keyval: &str, out: &mut impl Write) -> Result<()> {
        let keyval = parse_keyval(keyval)?;
        let entries = self.registry.get_entries_for_keyval(keyval);
        if entries.is_empty() {
            writeln!(out, "no key types {}", describe(keyval))?;
        }
        for entry in entries {
            writeln!(
                out,
                "group={} vk={:#04x} level={}",
                entry.group, entry.vk, entry.level
            )?;
        }
        Ok(())
    }

    fn keycode(&mut self, vk: &str, out: &mut impl Write) -> Result<()> {
        let vk = parse_vk(vk)?;
        let entries = self.registry.get_entries_for_keycode(vk);
        if entries.is_empty() {
            writeln!(out, "{:#04x} types nothing", vk)?;
        }
        for entry in entries {
            writeln!(
                out,
                "group={} level={} {}",
                entry.group,
                entry.level,
                describe(entry.keyval)
            )?;
        }
        Ok(())
    }

    fn repl(&mut self, out: &mut impl Write) -> Result<()> {
        let reload_requested = Arc::new(AtomicBool::new(false));
        {
            use signal_hook::iterator::Signals;
            let reload_requested = reload_requested.clone();
            let mut signals = Signals::new([signal_hook::consts::SIGHUP])
                .context("installing SIGHUP handler")?;

            // Spawn a thread to handle signals
            std::thread::spawn(move || {
                for signal in &mut signals {
                    if signal == signal_hook::consts::SIGHUP {
                        log::debug!("SIGHUP received, reload scheduled");
                        reload_requested.store(true, Ordering::SeqCst);
                    }
                }
            });
        }

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            if reload_requested.swap(false, Ordering::SeqCst) {
                if let Err(e) = self.reload() {
                    log::warn!("Reload failed, keeping previous state: {:#}", e);
                }
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            match words.first() {
                None => continue,
                Some(&"quit") | Some(&"exit") => break,
                Some(&"reload") => {
                    if let Err(e) = self.reload() {
                        writeln!(out, "error: {:#}", e)?;
                    }
                    continue;
                }
                Some(_) => {}
            }

            let command = match ReplLine::try_parse_from(words.iter().copied()) {
                Ok(parsed) => parsed.command,
                Err(e) => {
                    writeln!(out, "{}", e.to_string().trim_end())?;
                    continue;
                }
            };
            if command == Command::Repl {
                writeln!(out, "already reading commands")?;
                continue;
            }
            if let Err(e) = self.run(&command, out) {
                writeln!(out, "error: {:#}", e)?;
            }
            out.flush()?;
        }
        Ok(())
    }

    fn group_or_active(&mut self, group: Option<usize>) -> Result<usize> {
        group
            .or_else(|| self.registry.active_group())
            .ok_or_else(|| anyhow!("no layout groups loaded"))
    }
}

fn load_layouts(paths: &[PathBuf]) -> Result<LayoutFile> {
    let file = LayoutFile::from_paths(paths).context("loading layout files")?;
    log::debug!(
        "Loaded {} group(s) from {} file(s)",
        file.groups.len(),
        paths.len()
    );
    Ok(file)
}

fn parse_vk(text: &str) -> Result<u32> {
    vk::parse_vk(text).ok_or_else(|| anyhow!("invalid virtual key '{}'", text))
}

fn parse_keyval(text: &str) -> Result<KeyValue> {
    KeyValue::from_name(text).ok_or_else(|| anyhow!("unknown key value '{}'", text))
}

/// `shift+0x45` -> (SHIFT, 0x45); a bare key has no modifiers
fn parse_key_chord(text: &str) -> Result<(ModifierMask, u32)> {
    match text.rsplit_once('+') {
        Some((mods, key)) => {
            let state = ModifierMask::parse_list(mods).map_err(anyhow::Error::msg)?;
            Ok((state, parse_vk(key)?))
        }
        None => Ok((ModifierMask::empty(), parse_vk(text)?)),
    }
}

fn keyval_cell(keyval: KeyValue) -> String {
    if keyval.is_void() {
        "-".to_string()
    } else {
        keyval.name()
    }
}

fn describe(keyval: KeyValue) -> String {
    match keyval.to_unicode() {
        Some(c) if !c.is_control() => format!("{} '{}'", keyval.name(), c),
        _ => keyval.name(),
    }
}

fn describe_all(keyvals: &[KeyValue]) -> String {
    keyvals
        .iter()
        .map(|keyval| describe(*keyval))
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut app = Application::new(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.run(&args.command, &mut out)
}
