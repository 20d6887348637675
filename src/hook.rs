//! Scheduler hook
//!
//! An external build scheduler calls `before_compile` once before the
//! stage that consumes the atlas, and waits for `done`.

use crate::atlas::AtlasPipeline;
use crate::error::AtlasError;
use log::error;

/// Name the pipeline registers under
pub const HOOK_NAME: &str = "genatlas";

/// Completion callback; receives the fatal error, if any
pub type DoneCallback<'a> = Box<dyn FnOnce(Option<&AtlasError>) + 'a>;

pub trait BuildHook {
    fn name(&self) -> &'static str;

    /// Run before the dependent stage; `done` is called exactly once
    fn before_compile(&mut self, done: DoneCallback<'_>);
}

impl BuildHook for AtlasPipeline {
    fn name(&self) -> &'static str {
        HOOK_NAME
    }

    fn before_compile(&mut self, done: DoneCallback<'_>) {
        match self.run() {
            Ok(_) => done(None),
            Err(e) => {
                error!("Atlas build failed: {}", e);
                done(Some(&e));
            }
        }
    }
}
