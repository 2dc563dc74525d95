use criterion::{criterion_group, criterion_main, Criterion};
use rkro::{
    ast::Program, compiler::Compiler, environment::Environment, evaluator, lexer::Lexer,
    object::Object, parser::Parser,
};
use std::io;

fn source() -> String {
    let mut source = String::from("Let v0: Num = 0;\n");
    for i in 1..500 {
        source.push_str(&format!(
            "Let v{}: Num = (v{} + 2 * 3 - 6) / 1 + 1;\n",
            i,
            i - 1
        ));
    }
    source
}

fn parse(source: &str, env: &mut Environment) -> Program {
    let tokens = Lexer::new("bench.kro", source).tokenize().unwrap();
    let mut parser = Parser::new(tokens, env);
    parser.parse_program().unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let source = source();

    c.bench_function("lex 500 declarations", |b| {
        b.iter(|| Lexer::new("bench.kro", &source).tokenize().unwrap())
    });

    c.bench_function("parse 500 declarations", |b| {
        let tokens = Lexer::new("bench.kro", &source).tokenize().unwrap();
        b.iter(|| {
            let mut env = Environment::new();
            Parser::new(tokens.clone(), &mut env).parse_program().unwrap()
        })
    });

    let mut env = Environment::new();
    let program = parse(&source, &mut env);

    c.bench_function("interpret 500 declarations", |b| {
        b.iter(|| {
            let mut env = env.clone();

            match evaluator::interpret(&program, &mut env, &mut io::sink()) {
                Ok(()) => match env.get("v499") {
                    Some(Object::Number(n)) if n == 499.0 => {}
                    other => println!("Unexpected result: {:?}", other),
                },
                Err(e) => println!("Unexpected error: {}", e),
            }
        })
    });

    c.bench_function("compile 500 declarations", |b| {
        b.iter(|| {
            let mut compiler = Compiler::with_output(io::sink());
            if let Err(e) = compiler.compile_source("bench.kro", &source) {
                println!("Unexpected error: {}", e);
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
