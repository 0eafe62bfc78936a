use super::{
    fetch_group_load, load_clients, store_group_snapshot, update, PanelContext, PanelEffect,
    PanelMessage, PanelState,
};
use crate::shared::logging::LogLevel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Performs one effect synchronously and returns the message that completes it.
pub fn run_effect(ctx: &PanelContext, effect: PanelEffect) -> PanelMessage {
    match effect {
        PanelEffect::LoadClients { generation } => PanelMessage::ClientsLoaded {
            generation,
            clients: load_clients(ctx),
        },
        PanelEffect::LoadGroups { generation } => PanelMessage::GroupsLoaded {
            generation,
            load: fetch_group_load(ctx),
        },
        PanelEffect::StoreGroupSnapshot(groups) => {
            store_group_snapshot(ctx, &groups);
            PanelMessage::GroupSnapshotStored
        }
        PanelEffect::SaveClient { key, mutation } => {
            let result = ctx.service.save_client(&mutation);
            match &result {
                Ok(()) => ctx.log(
                    LogLevel::Info,
                    "client.saved",
                    &format!("key={key} endpoint={}", mutation.endpoint()),
                ),
                Err(err) => ctx.log(
                    LogLevel::Error,
                    "client.save_failed",
                    &format!("key={key} error={err}"),
                ),
            }
            PanelMessage::ClientSaved { key, result }
        }
        PanelEffect::DeleteClients(request) => {
            let result = ctx.service.delete_clients(&request);
            log_outcome(ctx, "clients.deleted", request.items.len(), &result);
            PanelMessage::ClientsDeleted(result)
        }
        PanelEffect::SaveGroup(mutation) => {
            let result = ctx.service.save_group(&mutation);
            match &result {
                Ok(()) => ctx.log(
                    LogLevel::Info,
                    "group.saved",
                    &format!("name={} endpoint={}", mutation.payload().name, mutation.endpoint()),
                ),
                Err(err) => ctx.log(LogLevel::Error, "group.save_failed", &err.to_string()),
            }
            PanelMessage::GroupSaved(result)
        }
        PanelEffect::DeleteGroups(request) => {
            let result = ctx.service.delete_groups(&request);
            log_outcome(ctx, "groups.deleted", request.items.len(), &result);
            PanelMessage::GroupsDeleted(result)
        }
    }
}

fn log_outcome<E: std::fmt::Display>(
    ctx: &PanelContext,
    event: &str,
    count: usize,
    result: &Result<(), E>,
) {
    match result {
        Ok(()) => ctx.log(LogLevel::Info, event, &format!("count={count}")),
        Err(err) => ctx.log(
            LogLevel::Error,
            &format!("{event}_failed"),
            &format!("count={count} error={err}"),
        ),
    }
}

/// Shared liveness flag. Once revoked, completions still in flight are
/// discarded instead of being delivered to a torn-down panel.
#[derive(Debug, Clone)]
pub struct LiveToken(Arc<AtomicBool>);

impl Default for LiveToken {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs effects on worker threads and hands completions back over a channel.
pub struct EffectRunner {
    ctx: PanelContext,
    tx: Sender<PanelMessage>,
    rx: Receiver<PanelMessage>,
    live: LiveToken,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(ctx: PanelContext) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            ctx,
            tx,
            rx,
            live: LiveToken::new(),
            in_flight: 0,
        }
    }

    pub fn context(&self) -> &PanelContext {
        &self.ctx
    }

    pub fn live_token(&self) -> LiveToken {
        self.live.clone()
    }

    pub fn spawn(&mut self, effect: PanelEffect) {
        let ctx = self.ctx.clone();
        let tx = self.tx.clone();
        let live = self.live.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let message = run_effect(&ctx, effect);
            if live.is_live() {
                let _ = tx.send(message);
            }
        });
    }

    pub fn spawn_all(&mut self, effects: Vec<PanelEffect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Next completion, if one is ready.
    pub fn try_next(&mut self) -> Option<PanelMessage> {
        if !self.live.is_live() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(message) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(message)
            }
            Err(_) => None,
        }
    }

    /// Waits for the next completion. Returns `None` when nothing is in
    /// flight or the runner has been shut down.
    pub fn next_blocking(&mut self) -> Option<PanelMessage> {
        if self.in_flight == 0 || !self.live.is_live() {
            return None;
        }
        match self.rx.recv() {
            Ok(message) => {
                self.in_flight -= 1;
                Some(message)
            }
            Err(_) => None,
        }
    }

    pub fn shutdown(&mut self) {
        self.live.revoke();
        self.in_flight = 0;
    }
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        self.live.revoke();
    }
}

/// Feeds a message through the store and starts whatever it asks for.
pub fn dispatch(state: &mut PanelState, runner: &mut EffectRunner, message: PanelMessage) {
    let effects = update(state, message);
    runner.spawn_all(effects);
}

/// Delivers completions until no effect is left in flight.
pub fn run_until_idle(state: &mut PanelState, runner: &mut EffectRunner) {
    while let Some(message) = runner.next_blocking() {
        dispatch(state, runner, message);
    }
}
