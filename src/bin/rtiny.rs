use std::env;
use std::error;
use std::fs;
use std::io::{self, stdin, BufRead, Write};
use std::result;

use program::perror;

extern crate rtiny;
use rtiny::core::{Interpreter, Parser, Scanner, TraceEvent};

type Error = Box<dyn error::Error>;
type Result<T> = result::Result<T, Error>;

fn parser(buf: String, trace: bool) -> Result<Parser> {
    let scanner = Scanner::new(buf);
    let tokens = scanner.scan_tokens()?;

    if trace {
        // Trace lines go to stderr; stdout carries nothing but results.
        Ok(Parser::with_tracer(
            tokens,
            Box::new(|event| match event {
                TraceEvent::Enter(rule) => eprintln!("Enter <{}>", rule),
                TraceEvent::Exit(rule) => eprintln!("Exit <{}>", rule),
            }),
        ))
    } else {
        Ok(Parser::new(tokens))
    }
}

fn run(buf: String, trace: bool) -> Result<()> {
    for value in parser(buf, trace)?.parse_program()? {
        println!("{}", value);
    }

    Ok(())
}

fn run_prompt() -> Result<()> {
    let stdin = stdin();
    // The prompt parses to trees and defers evaluation to a long lived
    // interpreter so declarations persist across entered lines.
    let mut interpreter = Interpreter::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut buf = String::with_capacity(1024);
        if stdin.lock().read_line(&mut buf)? == 0 {
            return Ok(());
        }

        let blocks = parser(buf, false)?.parse_blocks()?;
        for value in interpreter.interpret(&blocks)? {
            println!("{}", value);
        }
    }
}

fn run_file(f: &str, trace: bool) -> Result<()> {
    run(fs::read_to_string(f)?, trace)
}

fn fail_if_err(r: Result<()>) {
    if let Err(e) = r {
        perror(e)
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [_] => fail_if_err(run_prompt()),
        [_, "--trace", file] => fail_if_err(run_file(file, true)),
        [_, file] => fail_if_err(run_file(file, false)),
        _ => perror("usage: rtiny [--trace] [script]".to_owned()),
    }
}
