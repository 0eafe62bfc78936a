use crate::config::{default_state_root_path, load_settings, ConfigError, Settings, StatePaths};
use crate::panel::{dispatch, run_until_idle, EffectRunner, PanelContext, PanelMessage, PanelState};
use std::collections::{BTreeMap, BTreeSet};

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn state_paths() -> Result<StatePaths, String> {
    default_state_root_path()
        .map(StatePaths::new)
        .map_err(map_config_err)
}

pub fn load_cli_settings(paths: &StatePaths) -> Result<Settings, String> {
    load_settings(paths).map_err(map_config_err)
}

/// Parsed `--flag value` pairs, bare `--switch`es and positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub positional: Vec<String>,
    pub flags: BTreeMap<String, String>,
    pub switches: BTreeSet<String>,
}

impl CliArgs {
    pub fn parse(args: &[String], switches: &[&str]) -> Result<Self, String> {
        let mut out = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                out.positional.push(arg.clone());
                continue;
            };
            if switches.contains(&name) {
                out.switches.insert(name.to_string());
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("missing value for --{name}"))?;
            out.flags.insert(name.to_string(), value.clone());
        }
        Ok(out)
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, String> {
        self.flag(name)
            .ok_or_else(|| format!("missing required flag --{name}"))
    }

    pub fn has_switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }
}

/// A headless panel: the same store and effect runner the TUI uses, driven
/// to completion after every message.
pub struct CliSession {
    pub state: PanelState,
    pub runner: EffectRunner,
}

impl CliSession {
    pub fn new(ctx: PanelContext) -> Self {
        Self {
            state: PanelState::new(ctx.broker.clone()),
            runner: EffectRunner::new(ctx),
        }
    }

    pub fn open() -> Result<Self, String> {
        let paths = state_paths()?;
        let settings = load_cli_settings(&paths)?;
        Ok(Self::new(PanelContext::from_settings(&paths, &settings)))
    }

    pub fn send(&mut self, message: PanelMessage) {
        dispatch(&mut self.state, &mut self.runner, message);
        run_until_idle(&mut self.state, &mut self.runner);
    }

    pub fn mount(&mut self) {
        self.send(PanelMessage::Mount);
    }
}
