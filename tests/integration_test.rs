use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn run_command_with_input(args: &[&str], input: &str) -> Output {
    let mut child = Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");
    child
        .stdin
        .take()
        .expect("Failed to open stdin")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for command")
}

fn write_lecture(dir: &Path) {
    fs::write(
        dir.join("01-intro.md"),
        "% Introduction\n\n# 1. Course Overview\n\nFPGA and embedded Linux.\n",
    )
    .expect("Failed to write intro section");

    let mut setup = String::from("% Server Setup\n\n# 2. Server Setup\n\nPrepare the host.\n\n```bash\nsudo apt install build-essential\n```\n\n## 2.1 Users\n\n");
    for i in 0..12 {
        setup.push_str(&format!("Step {} of the account setup.\n\n", i + 1));
    }
    fs::write(dir.join("02-setup.md"), setup).expect("Failed to write setup section");
}

#[test]
fn test_build_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let content_dir = temp_dir.path().join("content");
    fs::create_dir(&content_dir).expect("Failed to create content dir");
    write_lecture(&content_dir);

    let css_path = temp_dir.path().join("theme.css");
    fs::write(&css_path, "body { font-family: Arial; }").expect("Failed to write CSS file");

    let output_path = temp_dir.path().join("dist/index.html");

    let output = run_command(&[
        "build",
        "-i",
        content_dir.to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--css",
        css_path.to_str().unwrap(),
        "--js",
        "https://example.com/highlight.js",
        "--title",
        "FPGA Linux Lecture",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(output_path.exists(), "Output file was not created");

    let html_content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html_content.contains("<title>FPGA Linux Lecture</title>"));
    assert!(html_content.contains("<style>body { font-family: Arial; }</style>"));
    assert!(html_content.contains(r#"<script src="https://example.com/highlight.js"></script>"#));
    assert!(html_content.contains("<h1>Course Overview</h1>"));
    assert!(html_content.contains("id=\"slide-setup-1\""));
    assert!(html_content.contains("<span class=\"counter\">2/2</span>"));
}

#[test]
fn test_default_resources_are_linked() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_lecture(temp_dir.path());
    let output_path = temp_dir.path().join("deck.html");

    let output = run_command(&[
        "build",
        "-i",
        temp_dir.path().to_str().unwrap(),
        "-o",
        output_path.to_str().unwrap(),
        "--mode",
        "link",
    ]);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let html_content = fs::read_to_string(&output_path).expect("Failed to read output file");
    assert!(html_content.contains("highlight.min.js"));
    assert!(html_content.contains("lucide"));
}

#[test]
fn test_outline_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_lecture(temp_dir.path());

    let output = run_command(&["outline", "-i", temp_dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Introduction (intro): 1 slides"));
    assert!(stdout.contains("Server Setup (setup): 2 slides"));
    assert!(stdout.contains("1. Server Setup"));
    assert!(stdout.contains("2. Users"));
}

#[test]
fn test_present_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_lecture(temp_dir.path());

    let output = run_command_with_input(
        &["present", "-i", temp_dir.path().to_str().unwrap(), "--start", "setup"],
        "l\nl\nh\ns intro\nq\n",
    );
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SERVER SETUP"));
    assert!(stdout.contains("## Users"));
    assert!(stdout.contains("2/2"));
    assert!(stdout.contains("COURSE OVERVIEW"));
}

#[test]
fn test_missing_content_dir_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_command(&[
        "build",
        "-i",
        temp_dir.path().join("missing").to_str().unwrap(),
        "-o",
        temp_dir.path().join("out.html").to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Path not found"));
}
