use anyhow::Result;
use saldo::cli::MenuSession;
use tempfile::TempDir;

/// Run a scripted menu session and return everything it printed
fn run_script(lines: &[&str]) -> Result<String> {
    let input = lines.join("\n") + "\n";
    let mut output = Vec::new();
    MenuSession::new(input.as_bytes(), &mut output, "S/").run()?;
    Ok(String::from_utf8(output)?)
}

#[test]
fn test_exit_immediately() -> Result<()> {
    let out = run_script(&["0"])?;
    assert!(out.contains("MAIN MENU"));
    assert!(out.contains("Goodbye!"));
    Ok(())
}

#[test]
fn test_end_of_input_exits() -> Result<()> {
    let mut output = Vec::new();
    MenuSession::new("".as_bytes(), &mut output, "S/").run()?;
    assert!(String::from_utf8(output)?.contains("Goodbye!"));
    Ok(())
}

#[test]
fn test_invalid_option() -> Result<()> {
    let out = run_script(&["abc", "42", "0"])?;
    assert_eq!(out.matches("[ERROR] Invalid option").count(), 2);
    Ok(())
}

#[test]
fn test_register_deposit_transfer_session() -> Result<()> {
    let out = run_script(&[
        "1",
        "12345678",
        "Ana Torres",
        "100.00",
        "3",
        "12345678",
        "50.00",
        "1",
        "87654321",
        "Luis Paz",
        "0.00",
        "5",
        "12345678",
        "87654321",
        "30.00",
        "6",
        "87654321",
        "4",
        "87654321",
        "500.00",
        "2",
        "7",
        "0",
    ])?;

    assert!(out.contains("[OK] User registered: Ana Torres"));
    assert!(out.contains("New balance: S/ 150.00"));
    assert!(out.contains("From: Ana Torres -> To: Luis Paz"));
    assert!(out.contains("Amount transferred: S/ 30.00"));
    assert!(out.contains("New balance of Ana Torres: S/ 120.00"));
    assert!(out.contains("Available:  S/ 30.00"));
    assert!(out.contains("[ERROR] Insufficient balance for user 87654321"));
    assert!(out.contains("Total users: 2"));
    assert!(out.contains("DEPOSIT - Amount: S/ 50.00 - User: 12345678"));
    assert!(out.contains("TRANSFER - Amount: S/ 30.00 - User: 12345678 -> 87654321"));
    assert!(out.contains("Total transactions: 2"));
    Ok(())
}

#[test]
fn test_registration_errors_are_rendered() -> Result<()> {
    let out = run_script(&[
        "1",
        "123",
        "Ana Torres",
        "100",
        "1",
        "12345678",
        "Ana Torres",
        "lots",
        "1",
        "12345678",
        "Ana Torres",
        "-5",
        "2",
        "0",
    ])?;

    assert!(out.contains("[ERROR] Invalid identifier '123'"));
    assert!(out.contains("[ERROR] Invalid opening balance: must be a non-negative number"));
    assert!(out.contains("[ERROR] Invalid opening balance -5"));
    assert!(out.contains("[INFO] No users registered."));
    Ok(())
}

#[test]
fn test_registration_reports_identifier_before_bad_balance_text() -> Result<()> {
    let out = run_script(&["1", "123", "X", "abc", "1", "12345678", "X", "abc", "0"])?;

    assert!(out.contains("[ERROR] Invalid identifier '123'"));
    assert!(out.contains("[ERROR] Invalid name 'X'"));
    assert!(!out.contains("Invalid opening balance"));
    Ok(())
}

#[test]
fn test_bad_amount_text() -> Result<()> {
    let out = run_script(&[
        "1",
        "12345678",
        "Ana Torres",
        "10",
        "3",
        "12345678",
        "ten",
        "4",
        "12345678",
        "",
        "0",
    ])?;

    assert!(out.contains("[ERROR] Invalid amount: 'ten' is not a valid number"));
    assert!(out.contains("[ERROR] Invalid amount: '' is not a valid number"));
    Ok(())
}

#[test]
fn test_history_views() -> Result<()> {
    let out = run_script(&[
        "7",
        "1",
        "12345678",
        "Ana Torres",
        "10",
        "8",
        "12345678",
        "8",
        "99999999",
        "0",
    ])?;

    assert!(out.contains("[INFO] No transactions recorded."));
    assert!(out.contains("[INFO] This user has no transactions."));
    assert!(out.contains("[ERROR] No user registered with identifier 99999999"));
    Ok(())
}

#[test]
fn test_verify_ledger() -> Result<()> {
    let out = run_script(&[
        "1",
        "12345678",
        "Ana Torres",
        "10",
        "3",
        "12345678",
        "2.5",
        "10",
        "0",
    ])?;

    assert!(out.contains("Transactions: 1"));
    assert!(out.contains("Holdings:     S/ 12.50  OK"));
    assert!(out.contains("Ledger is consistent."));
    Ok(())
}

#[test]
fn test_export_from_menu() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("users.csv");
    let path_str = path.to_str().expect("utf-8 temp path");

    let out = run_script(&[
        "1",
        "12345678",
        "Ana Torres",
        "10",
        "9",
        "users",
        path_str,
        "9",
        "xml",
        "0",
    ])?;

    assert!(out.contains("[OK] Exported users (1 rows)"));
    assert!(out.contains("[ERROR] Invalid export type 'xml'"));
    let written = std::fs::read_to_string(&path)?;
    assert_eq!(written, "identifier,name,balance\n12345678,Ana Torres,10\n");
    Ok(())
}

#[test]
fn test_export_to_missing_directory_is_reported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("missing").join("out.csv");
    let path_str = path.to_str().expect("utf-8 temp path");

    let out = run_script(&["9", "history", path_str, "0"])?;

    assert!(out.contains("[ERROR] Failed to create output file"));
    assert!(out.contains("Goodbye!"));
    Ok(())
}
