//! UCI driver loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use basalt::engine::EngineController;
use basalt::uci::{parse_uci_command, UciSink};

fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut controller = EngineController::new(Arc::new(UciSink));

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(command) = parse_uci_command(&line) else {
            continue;
        };
        if !controller.handle(command) {
            break;
        }
        let _ = stdout.flush();
    }
}
