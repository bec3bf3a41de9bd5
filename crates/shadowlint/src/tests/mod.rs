//! Unit and behavioural tests for lint orchestration.


#[cfg(unix)]
mod process;
#[cfg(unix)]
mod support;
