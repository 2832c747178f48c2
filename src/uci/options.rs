//! UCI option registry.

/// Engine options settable through `setoption`.
#[derive(Debug, Clone)]
pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub move_overhead_ms: u64,
    pub syzygy_path: Option<String>,
}

impl Default for UciOptions {
    fn default() -> Self {
        UciOptions {
            hash_mb: 16,
            threads: 1,
            move_overhead_ms: 10,
            syzygy_path: None,
        }
    }
}

/// Action the controller must take after an option change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionAction {
    None,
    ResizeHash(usize),
    ClearHash,
    SetThreads(usize),
    LoadTablebase(String),
}

impl UciOptions {
    /// Print the option registry for the `uci` handshake.
    pub fn print(&self) {
        println!(
            "option name Hash type spin default {} min 1 max 32768",
            self.hash_mb
        );
        println!("option name Clear Hash type button");
        println!(
            "option name Threads type spin default {} min 1 max 256",
            self.threads
        );
        println!(
            "option name Move Overhead type spin default {} min 0 max 5000",
            self.move_overhead_ms
        );
        println!("option name SyzygyPath type string default <empty>");
    }

    /// Apply a `setoption` command (already split into words).
    pub fn apply(&mut self, parts: &[&str]) -> OptionAction {
        // setoption name <name...> [value <value...>]
        let Some(name_idx) = parts.iter().position(|p| *p == "name") else {
            return OptionAction::None;
        };
        let value_idx = parts.iter().position(|p| *p == "value");
        let name_end = value_idx.unwrap_or(parts.len());
        let name = parts[name_idx + 1..name_end].join(" ").to_lowercase();
        let value = value_idx.map(|idx| parts[idx + 1..].join(" "));

        match name.as_str() {
            "hash" => {
                if let Some(mb) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.hash_mb = mb.clamp(1, 32_768);
                    return OptionAction::ResizeHash(self.hash_mb);
                }
            }
            "clear hash" => return OptionAction::ClearHash,
            "threads" => {
                if let Some(n) = value.and_then(|v| v.parse::<usize>().ok()) {
                    self.threads = n.clamp(1, 256);
                    return OptionAction::SetThreads(self.threads);
                }
            }
            "move overhead" => {
                if let Some(ms) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.move_overhead_ms = ms.min(5000);
                }
            }
            "syzygypath" => {
                if let Some(path) = value {
                    if !path.is_empty() && path != "<empty>" {
                        self.syzygy_path = Some(path.clone());
                        return OptionAction::LoadTablebase(path);
                    }
                }
            }
            _ => {}
        }
        OptionAction::None
    }
}
