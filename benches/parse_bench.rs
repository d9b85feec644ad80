use criterion::{black_box, criterion_group, criterion_main, Criterion};
use importsweep::confidence::ConfidenceWeights;
use importsweep::correlate::Correlator;
use importsweep::diagnostic::Marker;
use importsweep::parse::go::GoGrammar;
use importsweep::parse::python::PythonGrammar;
use importsweep::parse::typescript::TypeScriptGrammar;
use importsweep::parse::{collect_imports, AdapterRegistry};
use importsweep::scan::scan;
use std::path::Path;

fn go_source_snippet() -> &'static str {
    "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\t\"github.com/example/pkg/api\"\n\t\"github.com/example/pkg/db\"\n)\n\nfunc main() {\n\tfmt.Println(\"hello\", os.Args, api.Version)\n}\n"
}

fn python_source_snippet() -> &'static str {
    "import os\nimport sys\nfrom collections import OrderedDict\nfrom .utils import (\n    helper,\n    loader,\n)\nfrom ..config import settings\n\ndef main():\n    helper(sys.argv, settings)\n"
}

fn typescript_source_snippet() -> &'static str {
    "import React from 'react';\nimport { useState, useEffect, useMemo } from 'react';\nimport * as path from 'path';\nimport './styles.css';\nimport type { Props } from './types';\n\nexport function App(props: Props) {\n  const [n, setN] = useState(0);\n  return n + path.sep.length;\n}\n"
}

fn bench_collect_imports(c: &mut Criterion) {
    c.bench_function("python_collect_imports", |b| {
        b.iter(|| black_box(collect_imports(&PythonGrammar, black_box(python_source_snippet())).len()))
    });
    c.bench_function("go_collect_imports", |b| {
        b.iter(|| black_box(collect_imports(&GoGrammar, black_box(go_source_snippet())).len()))
    });
    c.bench_function("typescript_collect_imports", |b| {
        b.iter(|| {
            black_box(collect_imports(&TypeScriptGrammar, black_box(typescript_source_snippet())).len())
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    c.bench_function("python_usage_scan", |b| {
        b.iter(|| {
            black_box(scan(&PythonGrammar, Path::new("app.py"), black_box(python_source_snippet())).len())
        })
    });
    c.bench_function("typescript_usage_scan", |b| {
        b.iter(|| {
            black_box(
                scan(&TypeScriptGrammar, Path::new("app.tsx"), black_box(typescript_source_snippet())).len(),
            )
        })
    });
}

fn bench_correlate(c: &mut Criterion) {
    let registry = AdapterRegistry::with_builtin();
    let correlator = Correlator::new(&registry, ConfidenceWeights::default());
    let text = typescript_source_snippet();
    let markers = vec![
        Marker::unused("app.tsx", 2, "'useEffect' is declared but its value is never read.")
            .with_origin("ts")
            .with_code("6133"),
        Marker::unused("app.tsx", 2, "'useMemo' is declared but its value is never read.")
            .with_origin("ts")
            .with_code("6133"),
    ];
    c.bench_function("typescript_correlate_file", |b| {
        b.iter(|| black_box(correlator.correlate_file(black_box(&markers), text).len()))
    });
}

criterion_group!(benches, bench_collect_imports, bench_scan, bench_correlate);
criterion_main!(benches);
