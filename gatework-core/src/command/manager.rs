//! Command Manager
//!
//! The manager is the transaction log for graph mutations. It keeps two
//! stacks: commands that have been executed, and commands that have been
//! undone. Running a fresh command clears the undone stack, so there is
//! no redo across a new edit.
//!
//! Commands are infallible once constructed; every validation and all
//! state capture happens in the command constructors. The manager
//! therefore never has to cope with a half-applied command.

use tracing::debug;

use crate::graph::Circuit;

/// A reversible unit of graph mutation.
pub trait Command {
    /// Short name for logs.
    fn label(&self) -> &'static str;

    /// Apply the effect to the circuit.
    fn execute(&mut self, circuit: &mut Circuit);

    /// Exactly invert [`execute`](Command::execute).
    fn undo(&mut self, circuit: &mut Circuit);
}

/// Two-stack execute/undo/redo log.
#[derive(Default)]
pub struct CommandManager {
    executed: Vec<Box<dyn Command>>,
    undone: Vec<Box<dyn Command>>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and push it onto the executed stack.
    ///
    /// Any previously undone commands are discarded.
    pub fn run(&mut self, circuit: &mut Circuit, mut command: Box<dyn Command>) {
        debug!(command = command.label(), "execute");
        command.execute(circuit);
        self.executed.push(command);
        self.undone.clear();
    }

    /// Undo the most recent command. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, circuit: &mut Circuit) -> bool {
        match self.executed.pop() {
            Some(mut command) => {
                debug!(command = command.label(), "undo");
                command.undo(circuit);
                self.undone.push(command);
                true
            }
            None => false,
        }
    }

    /// Re-execute the most recently undone command. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self, circuit: &mut Circuit) -> bool {
        match self.undone.pop() {
            Some(mut command) => {
                debug!(command = command.label(), "redo");
                command.execute(circuit);
                self.executed.push(command);
                true
            }
            None => false,
        }
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.executed.is_empty()
    }

    /// Whether a redo is available.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
}

impl std::fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandManager")
            .field("executed", &self.executed.len())
            .field("undone", &self.undone.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Probe command recording the calls it receives.
    struct Probe {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Command for Probe {
        fn label(&self) -> &'static str {
            "probe"
        }

        fn execute(&mut self, _circuit: &mut Circuit) {
            self.log.borrow_mut().push("execute");
        }

        fn undo(&mut self, _circuit: &mut Circuit) {
            self.log.borrow_mut().push("undo");
        }
    }

    #[test]
    fn undo_redo_replays_the_command() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        manager.run(&mut circuit, Box::new(Probe { log: log.clone() }));
        assert!(manager.can_undo());
        assert!(!manager.can_redo());

        assert!(manager.undo(&mut circuit));
        assert!(manager.can_redo());

        assert!(manager.redo(&mut circuit));
        assert_eq!(*log.borrow(), ["execute", "undo", "execute"]);
    }

    #[test]
    fn a_fresh_command_clears_the_redo_stack() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        manager.run(&mut circuit, Box::new(Probe { log: log.clone() }));
        manager.undo(&mut circuit);
        manager.run(&mut circuit, Box::new(Probe { log: log.clone() }));

        assert!(!manager.can_redo());
        assert!(!manager.redo(&mut circuit));
    }

    #[test]
    fn empty_stacks_report_nothing_to_do() {
        let mut circuit = Circuit::new();
        let mut manager = CommandManager::new();
        assert!(!manager.undo(&mut circuit));
        assert!(!manager.redo(&mut circuit));
    }
}
