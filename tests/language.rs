use std::fs;
use std::path::Path;

use rkro::compiler::{Compiler, Error};
use rkro::evaluator::EvalError;
use rkro::object::Object;
use rkro::parser::ParserError;
use walkdir::WalkDir;

fn run(src: &str) -> Result<String, Error> {
    let mut compiler = Compiler::with_output(Vec::new());
    compiler.compile_source("language.kro", src)?;
    Ok(String::from_utf8(compiler.into_output()).unwrap())
}

fn assert_output(src: &str, expected: &str) {
    match run(src) {
        Ok(output) => assert_eq!(expected, output, "for:\n{}", src),
        Err(e) => panic!("program failed:\n{}\nError: {}", src, e),
    }
}

#[test]
fn program_files_match_expected_output() {
    let mut count = 0;

    for entry in WalkDir::new("tests/programs")
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "kro"))
    {
        let path = entry.path();
        let expected = fs::read_to_string(path.with_extension("out"))
            .unwrap_or_else(|e| panic!("Failed to read expected output of {path:?}: {e}"));

        let mut compiler = Compiler::with_output(Vec::new());
        if let Err(e) = compiler.compile_file(path) {
            panic!("{:?} failed:\n{}", path, e);
        }

        let output = String::from_utf8(compiler.into_output()).unwrap();
        assert_eq!(expected, output, "for {:?}", path);
        count += 1;
    }

    assert!(count > 0, "No programs found in tests/programs");
}

#[test]
fn print_renderings() {
    assert_output("Print -> 1 + 1;", "2\n");
    assert_output("Print -> 'a' + 'b';", "ab\n");
    assert_output("Print -> True && False;", "False\n");
    assert_output("Print -> !Nil;", "True\n");
    assert_output("Print -> 9 / 0;", "NaN\n");
}

#[test]
fn declaration_without_initializer_reads_nil() {
    assert_output("Let x: Str;\nPrint -> x;", "Nil\n");
}

#[test]
fn self_referential_declaration_uses_previous_value() {
    assert_output("Let a: Num = 5;\nLet a: Num = a + 1;\nPrint -> a;", "6\n");
    assert_output("Let a: Num = 5;\na = a + 1;\na = a + 1;\nPrint -> a;", "7\n");
}

#[test]
fn blocks_share_the_enclosing_environment() {
    assert_output(
        "Let a: Num = 1;\n{\n  a = 2;\n  Let b: Num = a + 1;\n}\nPrint -> a + b;",
        "5\n",
    );
}

#[test]
fn nil_operand_names_operator() {
    for operator in &["+", "-", "*", "/", "<", "<=", ">", ">="] {
        let src = format!("Let n: Num;\nPrint -> n {} 1;", operator);
        match run(&src) {
            Err(Error::Eval(err @ EvalError::NilOperand { .. })) => {
                let message = err.to_string();
                assert!(message.contains("line:2"), "{}", message);
                assert!(
                    message.contains(&format!("operation '{}'", operator)),
                    "{}",
                    message
                );
            }
            other => panic!("unexpected {:?} for `{}`", other, src),
        }
    }
}

#[test]
fn missing_colon_reports_line() {
    match run("Let a: Num = 1;\n\nLet b Num = 2;") {
        Err(Error::Parse(err @ ParserError::ExpectedColon(_))) => {
            assert_eq!(":", err.expected());
            assert_eq!(3, err.token().line);
            assert_eq!(
                "| File language.kro, line:3\n| Syntax Error: near 'Num', expected ':'",
                err.to_string()
            );
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn lexical_error_aborts_before_running() {
    match run("Print -> 1;\nPrint -> 2 # 3;") {
        Err(Error::Lex(err)) => assert!(err.to_string().contains("line:2")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn reserved_keywords_are_syntax_errors() {
    for src in &["Ret 1;", "Fun;", "For x;", "Let Class: Num;"] {
        assert!(
            matches!(run(src), Err(Error::Parse(_))),
            "expected a syntax error for `{}`",
            src
        );
    }
}

#[test]
fn repl_lines_share_definitions() {
    let mut compiler = Compiler::with_output(Vec::new());

    for line in &["Let total: Num = 10", "Let label: Str = 'total: '", "total = total / 4"] {
        compiler.compile_line(line).unwrap();
    }
    compiler.compile_line("Print -> label").unwrap();
    compiler.compile_line("Print -> total").unwrap();

    assert_eq!(Some(Object::Number(2.5)), compiler.environment().get("total"));
    assert_eq!(
        "total: \n2.5\n",
        String::from_utf8(compiler.into_output()).unwrap()
    );
}

#[test]
fn compile_file_reports_path() {
    let path = Path::new("tests/programs/does-not-exist.kro");
    let mut compiler = Compiler::with_output(Vec::new());
    assert!(matches!(compiler.compile_file(path), Err(Error::Io(_))));
}
