use super::*;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str, sql: &str) {
    std::fs::write(dir.join(name), sql).unwrap();
}

#[test]
fn test_scan_pairs_up_and_down() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    touch(dir, "000001_create_users.up.sql", "CREATE TABLE users (id INT);");
    touch(dir, "000001_create_users.down.sql", "DROP TABLE users;");
    touch(dir, "000002_add_email.up.sql", "ALTER TABLE users ADD COLUMN email TEXT;");

    let source = MigrationSource::scan(dir).unwrap();
    assert_eq!(source.len(), 2);
    assert_eq!(source.highest_version(), 2);

    let first = source.get(1).unwrap();
    assert_eq!(first.title, "create_users");
    assert!(first.read_up().unwrap().contains("CREATE TABLE"));
    assert_eq!(first.read_down().unwrap().as_deref(), Some("DROP TABLE users;"));

    let second = source.get(2).unwrap();
    assert!(second.down_path.is_none());
    assert_eq!(second.read_down().unwrap(), None);
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();
    let source = MigrationSource::scan(temp.path()).unwrap();
    assert!(source.is_empty());
    assert_eq!(source.highest_version(), 0);
}

#[test]
fn test_missing_directory() {
    let temp = TempDir::new().unwrap();
    let err = MigrationSource::scan(&temp.path().join("nope"))
        .unwrap_err()
        .to_string();
    assert!(err.contains("E004"), "got: {err}");
}

#[test]
fn test_gap_rejected() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "1_a.up.sql", "SELECT 1;");
    touch(temp.path(), "3_c.up.sql", "SELECT 1;");

    let err = MigrationSource::scan(temp.path()).unwrap_err().to_string();
    assert!(err.contains("MIG002"), "got: {err}");
}

#[test]
fn test_duplicate_version_rejected() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "1_a.up.sql", "SELECT 1;");
    touch(temp.path(), "0001_b.up.sql", "SELECT 1;");

    let err = MigrationSource::scan(temp.path()).unwrap_err().to_string();
    assert!(err.contains("MIG001"), "got: {err}");
}

#[test]
fn test_down_without_up_rejected() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "1_a.up.sql", "SELECT 1;");
    touch(temp.path(), "2_b.down.sql", "SELECT 1;");

    let err = MigrationSource::scan(temp.path()).unwrap_err().to_string();
    assert!(err.contains("MIG003"), "got: {err}");
}

#[test]
fn test_unrelated_files_skipped() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "1_a.up.sql", "SELECT 1;");
    touch(temp.path(), "README.md", "docs");
    touch(temp.path(), "seed.sql", "SELECT 1;");

    let source = MigrationSource::scan(temp.path()).unwrap();
    assert_eq!(source.len(), 1);
    assert_eq!(source.iter().next().unwrap().version, 1);
}

#[test]
fn test_parse_migration_file_name() {
    assert_eq!(
        parse_migration_file_name("12_add_index.up.sql"),
        Some((12, "add_index", FileDirection::Up))
    );
    assert_eq!(
        parse_migration_file_name("3.down.sql"),
        Some((3, "", FileDirection::Down))
    );
    assert_eq!(parse_migration_file_name("3_x.sql"), None);
    assert_eq!(parse_migration_file_name("x_3.up.sql"), None);
}
