use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treelox::{parse, scan, Interpreter};

const FIBONACCI: &str = r#"
    var a = 0;
    var b = 1;
    for (var i = 0; i < 60; i = i + 1) {
        var next = a + b;
        a = b;
        b = next;
    }
    print a;
"#;

const NESTED_SCOPES: &str = r#"
    var total = 0;
    var i = 0;
    while (i < 200) {
        {
            var inner = i * 2;
            {
                var deeper = inner + 1;
                total = total + deeper;
            }
        }
        i = i + 1;
    }
    print total;
"#;

fn parse_benchmark(c: &mut Criterion) {
    c.bench_function("parse fibonacci program", |b| {
        b.iter(|| {
            let (tokens, _) = scan(black_box(FIBONACCI));
            parse(tokens)
        })
    });
}

fn interpret_benchmark(c: &mut Criterion) {
    let (tokens, _) = scan(FIBONACCI);
    let (fibonacci, _) = parse(tokens);
    c.bench_function("interpret fibonacci loop", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::with_output(Vec::new());
            interpreter.interpret(black_box(&fibonacci))
        })
    });

    let (tokens, _) = scan(NESTED_SCOPES);
    let (nested, _) = parse(tokens);
    c.bench_function("interpret nested block scopes", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::with_output(Vec::new());
            interpreter.interpret(black_box(&nested))
        })
    });
}

fn end_to_end_benchmark(c: &mut Criterion) {
    c.bench_function("run string concatenation", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::with_output(Vec::new());
            treelox::run(
                black_box("var s = \"\"; for (var i = 0; i < 50; i = i + 1) s = s + \"x\"; print s;"),
                &mut interpreter,
            )
        })
    });
}

criterion_group!(
    benches,
    parse_benchmark,
    interpret_benchmark,
    end_to_end_benchmark
);
criterion_main!(benches);
