//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lifedesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use lifedesk_core::{parse_module_id, supported_module_strings};

fn main() {
    println!("lifedesk_core ping={}", lifedesk_core::ping());
    println!("lifedesk_core version={}", lifedesk_core::core_version());
    println!("modules:");
    for value in supported_module_strings() {
        match parse_module_id(value) {
            Ok(module) => println!("  {} - {}", module.as_str(), module.description()),
            Err(err) => eprintln!("  {value}: {err}"),
        }
    }
}
