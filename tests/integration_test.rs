use image::Rgba;
use placeholder_icons::font::find_system_font;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const EXPECTED_FILES: [(&str, u32); 4] = [
    ("icon16.png", 16),
    ("icon32.png", 32),
    ("icon48.png", 48),
    ("icon128.png", 128),
];

/// Runs `placeholder-icons` with no arguments in an empty directory and asserts
/// that exactly the four default icons are written with matching dimensions.
#[test]
fn test_default_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(temp_dir.path(), &[]);
    assert_success(&output);

    assert_default_icons(temp_dir.path());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Created icon16.png",
            "Created icon32.png",
            "Created icon48.png",
            "Created icon128.png",
        ]
    );
}

/// A second run overwrites the same four files and creates nothing else
#[test]
fn test_rerun_overwrites() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    // A stale file with one of the output names gets replaced
    std::fs::write(temp_dir.path().join("icon32.png"), b"stale").unwrap();

    assert_success(&run_in(temp_dir.path(), &[]));
    assert_success(&run_in(temp_dir.path(), &[]));

    assert_default_icons(temp_dir.path());
}

#[test]
fn test_custom_options() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("nested").join("icons");

    let output = run_in(
        temp_dir.path(),
        &[
            "-o",
            output_dir.to_str().expect("Temp path should be UTF-8"),
            "--sizes",
            "20,64",
            "--text",
            "X",
            "--bg-color",
            "#ff0000",
        ],
    );
    assert_success(&output);

    assert_eq!(
        file_names(&output_dir),
        BTreeSet::from(["icon20.png".to_string(), "icon64.png".to_string()])
    );

    let icon = image::open(output_dir.join("icon64.png"))
        .expect("Failed to load icon64.png")
        .to_rgba8();
    assert_eq!(icon.width(), 64);
    assert_eq!(*icon.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
}

#[test]
fn test_missing_font_still_renders() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(
        temp_dir.path(),
        &["--font", "/nonexistent/font.ttf"],
    );
    assert_success(&output);

    assert_default_icons(temp_dir.path());
}

/// A file that can't be created stops the batch; earlier icons stay in place
#[test]
fn test_write_failure_aborts_batch() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    // A directory can't be opened as a PNG file
    std::fs::create_dir(temp_dir.path().join("icon32.png")).unwrap();

    let output = run_in(temp_dir.path(), &[]);
    assert!(!output.status.success(), "Write failure should fail the run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["Created icon16.png"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create PNG file"), "stderr: {stderr}");
    assert!(stderr.contains("icon32.png"), "stderr: {stderr}");

    assert_eq!(
        file_names(temp_dir.path()),
        BTreeSet::from(["icon16.png".to_string(), "icon32.png".to_string()])
    );
    assert!(temp_dir.path().join("icon32.png").is_dir());

    let icon =
        image::open(temp_dir.path().join("icon16.png")).expect("Failed to load icon16.png");
    assert_eq!(icon.width(), 16);
}

#[test]
fn test_verbose_reports_font_per_icon() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(
        temp_dir.path(),
        &["--verbose", "--font", "/nonexistent/font.ttf"],
    );
    assert_success(&output);

    let expected_kind = if find_system_font().is_some() {
        "default"
    } else {
        "none"
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    let mut expected = Vec::new();
    for (name, _) in EXPECTED_FILES {
        expected.push(format!("  {name}: {expected_kind} font"));
        expected.push(format!("Created {name}"));
    }
    assert_eq!(lines, expected);

    assert_default_icons(temp_dir.path());
}

#[test]
fn test_invalid_color_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(
        temp_dir.path(),
        &["--bg-color", "not-a-color"],
    );
    assert!(!output.status.success(), "Invalid color should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid background color"), "stderr: {stderr}");
    assert!(file_names(temp_dir.path()).is_empty());
}

#[test]
fn test_zero_size_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_in(temp_dir.path(), &["--sizes", "0,16"]);
    assert!(!output.status.success(), "Size 0 should be rejected");
    assert!(file_names(temp_dir.path()).is_empty());
}

#[test]
fn test_verify_icon_tool() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    assert_success(&run_in(temp_dir.path(), &[]));

    let output = Command::new(env!("CARGO_BIN_EXE_verify_icon"))
        .arg(temp_dir.path().join("icon48.png"))
        .output()
        .expect("Failed to run verify_icon");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Image dimensions: 48x48"));
    assert!(stdout.contains("0 pixels are not fully opaque"));
    assert!(stdout.contains("✓ Valid placeholder icon"));
}

fn assert_default_icons(dir: &Path) {
    let expected: BTreeSet<String> = EXPECTED_FILES
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(file_names(dir), expected);

    for (name, size) in EXPECTED_FILES {
        let icon = image::open(dir.join(name))
            .unwrap_or_else(|e| panic!("Failed to decode {}: {}", name, e));
        assert_eq!(icon.width(), size, "{} width", name);
        assert_eq!(icon.height(), size, "{} height", name);
        assert!(icon.color().has_alpha(), "{} should have an alpha channel", name);
    }
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run placeholder-icons")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("placeholder-icons command failed");
    }
}

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_placeholder-icons"))
}
