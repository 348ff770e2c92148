//! Scripted [`ProcessManager`] for tests

use crate::error::{Error, Result};
use crate::process::{CommandOutput, CommandSpec, ManagedProcess, OutputStream, ProcessManager};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Behaviour of the next spawned process
#[derive(Debug, Clone, Default)]
pub struct FakeScript {
    pub stdout: String,
    pub stderr: String,
    /// Exit on its own with this code instead of running until stopped
    pub exits_with: Option<Option<i32>>,
    /// Ignore terminate requests (only kill stops it)
    pub ignores_terminate: bool,
}

#[derive(Default)]
pub struct FakeProcessManager {
    log: Arc<Mutex<Vec<String>>>,
    outputs: Mutex<HashMap<String, CommandOutput>>,
    script: Mutex<FakeScript>,
}

impl FakeProcessManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: FakeScript) -> Self {
        let pm = Self::default();
        *pm.script.lock().unwrap() = script;
        pm
    }

    /// Canned output for a command line (as displayed by `CommandSpec`)
    pub fn on_output(&self, command: &str, code: i32, stdout: &str) {
        self.outputs.lock().unwrap().insert(
            command.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    /// Every command run or spawned, plus process signals, in order
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessManager for FakeProcessManager {
    async fn spawn(&self, spec: &CommandSpec) -> Result<Box<dyn ManagedProcess>> {
        self.log.lock().unwrap().push(format!("spawn {}", spec));
        let script = self.script.lock().unwrap().clone();
        let (exit_tx, exit_rx) = watch::channel(script.exits_with);

        Ok(Box::new(FakeProcess {
            stdout: Some(script.stdout.into_bytes()),
            stderr: Some(script.stderr.into_bytes()),
            ignores_terminate: script.ignores_terminate,
            exit_tx,
            exit_rx,
            log: Arc::clone(&self.log),
        }))
    }

    async fn output(
        &self,
        spec: &CommandSpec,
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput> {
        let line = spec.to_string();
        self.log.lock().unwrap().push(format!("run {}", line));
        self.outputs
            .lock()
            .unwrap()
            .get(&line)
            .cloned()
            .ok_or_else(|| Error::process_spawn(line, "not scripted"))
    }

    async fn run_inherited(&self, spec: &CommandSpec) -> Result<Option<i32>> {
        Ok(self.output(spec, None).await?.code)
    }
}

struct FakeProcess {
    stdout: Option<Vec<u8>>,
    stderr: Option<Vec<u8>>,
    ignores_terminate: bool,
    exit_tx: watch::Sender<Option<Option<i32>>>,
    exit_rx: watch::Receiver<Option<Option<i32>>>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ManagedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout
            .take()
            .map(|bytes| Box::pin(Cursor::new(bytes)) as OutputStream)
    }

    fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr
            .take()
            .map(|bytes| Box::pin(Cursor::new(bytes)) as OutputStream)
    }

    async fn wait(&mut self) -> Result<Option<i32>> {
        let state = self
            .exit_rx
            .wait_for(|state| state.is_some())
            .await
            .map_err(|e| Error::process_spawn("fake", e.to_string()))?;
        let exit = *state;
        Ok(exit.flatten())
    }

    async fn terminate(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("terminate".to_string());
        if !self.ignores_terminate {
            self.exit_tx.send_replace(Some(None));
        }
        Ok(())
    }

    async fn kill(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("kill".to_string());
        self.exit_tx.send_replace(Some(None));
        Ok(())
    }
}
