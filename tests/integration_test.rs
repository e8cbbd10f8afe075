use std::error;
use std::fs::File;
use std::io::Read;
use std::process::Command;
use std::result;

type Error = Box<dyn error::Error>;
type Result<T> = result::Result<T, Error>;

/// Gets the correct stdout file given the category and test
fn expected_output(category: &str, test: &str) -> Result<Vec<u8>> {
    let output_base = "tests/output";
    let mut f = File::open(format!("{}/{}/{}.stdout", output_base, category, test))?;

    let mut buffer = Vec::new();
    f.read_to_end(&mut buffer)?;

    Ok(buffer)
}

fn cmd(category: &str, test: &str) -> Result<Vec<u8>> {
    let output = Command::new("./target/debug/rtiny")
        .arg(format!("tests/tiny/{}/{}.tiny", category, test))
        .output()?;

    Ok(output.stdout)
}

#[test]
fn tiny_arithmetic_precedence() -> Result<()> {
    let actual = cmd("arithmetic", "precedence")?;
    let expected = expected_output("arithmetic", "precedence")?;

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn tiny_arithmetic_grouping() -> Result<()> {
    let actual = cmd("arithmetic", "grouping")?;
    let expected = expected_output("arithmetic", "grouping")?;

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn tiny_declaration_variables() -> Result<()> {
    let actual = cmd("declaration", "variables")?;
    let expected = expected_output("declaration", "variables")?;

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn tiny_declaration_casts() -> Result<()> {
    let actual = cmd("declaration", "casts")?;
    let expected = expected_output("declaration", "casts")?;

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn tiny_conditional_branches() -> Result<()> {
    let actual = cmd("conditional", "branches")?;
    let expected = expected_output("conditional", "branches")?;

    assert_eq!(actual, expected);
    Ok(())
}

#[test]
fn tiny_trace_keeps_results_clean_on_stdout() -> Result<()> {
    let output = Command::new("./target/debug/rtiny")
        .arg("--trace")
        .arg("tests/tiny/arithmetic/precedence.tiny")
        .output()?;

    // Results only on stdout; the rule trace lands on stderr.
    assert_eq!(expected_output("arithmetic", "precedence")?, output.stdout);

    let trace = String::from_utf8(output.stderr)?;
    assert!(trace.contains("Enter <prog>"));
    assert!(trace.contains("Exit <prog>"));
    Ok(())
}
