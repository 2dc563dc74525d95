use std::io;

use rkro::{
    ast::Program, environment::Environment, evaluator, lexer::Lexer, object::Object,
    parser::Parser,
};

const LINKS: usize = 20_000;

fn main() {
    let mut env = Environment::new();
    let program = match parse(&mut env) {
        Ok(program) => program,
        Err(e) => {
            println!("Unexpected error: {}", e);
            return;
        }
    };

    let res = evaluator::interpret(&program, &mut env, &mut io::stdout());
    match res {
        Ok(()) => {
            let last = env.get(&format!("v{}", LINKS - 1)).unwrap_or(Object::Nil);
            println!("Result: {}", last)
        }
        Err(e) => println!("Unexpected error: {}", e),
    }
}

/// A chain of declarations, each one reading the previous link.
fn source() -> String {
    let mut source = String::from("Let v0: Num = 0;\nLet label: Str = 'v';\n");
    for i in 1..LINKS {
        source.push_str(&format!(
            "Let v{}: Num = (v{} * 2 - v{}) / 1 + 1;\n",
            i,
            i - 1,
            i - 1
        ));
    }
    source.push_str(&format!(
        "Print -> label + 'done';\nPrint -> v{} == {};\n",
        LINKS - 1,
        LINKS - 1
    ));
    source
}

fn parse(env: &mut Environment) -> Result<Program, Box<dyn std::error::Error>> {
    let source = source();
    let tokens = Lexer::new("chain.kro", &source).tokenize()?;
    let mut parser = Parser::new(tokens, env);
    Ok(parser.parse_program()?)
}
