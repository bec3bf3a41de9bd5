//! Unit and behavioural tests for shadow tree construction and removal.

mod support;

#[cfg(unix)]
mod behaviour;
#[cfg(unix)]
mod reaper;
