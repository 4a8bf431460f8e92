// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::Path;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_uartwave"))
}

#[test]
fn test_cli_version() {
    let output = bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{}", stdout);
}

#[test]
fn test_cli_rejects_flags() {
    let output = bin()
        .args(["--baud", "9600"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--baud"), "{}", stderr);
}

#[test]
fn test_cli_exits_1_when_uart_missing() {
    // On a board with the UART present the binary would stream forever.
    if Path::new(uartwave_config::DEFAULT_DEVICE).exists() {
        eprintln!(
            "skipping: {} exists on this host",
            uartwave_config::DEFAULT_DEVICE
        );
        return;
    }

    let output = bin().output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{}{}", stdout, stderr);

    assert_eq!(output.status.code(), Some(1), "{}", combined);
    assert!(combined.contains("Failed to open UART"), "{}", combined);
    assert!(combined.contains(uartwave_config::DEFAULT_DEVICE), "{}", combined);
    // The loop never started.
    assert!(!combined.contains("Sent:"), "{}", combined);
    assert!(!combined.contains("Outputting sine wave"), "{}", combined);
}
