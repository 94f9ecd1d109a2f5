// brewin-core -- a tree-walking evaluator for the Brewin teaching language
// Copyright (C) 2026  The brewin-core Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A tiny demo CLI. There is no lexer/parser in this crate, so this binary
//! builds a fixed demonstration program directly as an `ast::Program` and
//! runs it against the real console, mirroring how a frontend crate would
//! drive `brewin_core::run` after parsing a `.brew` file of its own.

use log::Level;
use structopt::StructOpt;

use brewin_core::ast::build::*;
use brewin_core::ast::{BinOp, Program};
use brewin_core::host::StdHost;

#[derive(Debug, StructOpt)]
#[structopt(name = "brewin-demo", about = "Run a small built-in Brewin program")]
struct Opt {
    /// Print trace-level evaluator logging (scope pushes, call dispatch).
    #[structopt(short, long)]
    verbose: bool,
}

fn demo_program() -> Program {
    // func main() {
    //   var i;
    //   var sum;
    //   sum = 0;
    //   for (i = 0; i < 5; i = i + 1) {
    //     print("i = ", i);
    //     sum = sum + i;
    //   }
    //   print("sum = ", sum);
    // }
    Program {
        functions: vec![func(
            "main",
            vec![],
            vec![
                vardef("i"),
                vardef("sum"),
                assign("sum", int(0)),
                for_stmt(
                    assign("i", int(0)),
                    binary(BinOp::Lt, var("i"), int(5)),
                    assign("i", binary(BinOp::Add, var("i"), int(1))),
                    vec![
                        call_stmt("print", vec![string("i = "), var("i")]),
                        assign("sum", binary(BinOp::Add, var("sum"), var("i"))),
                    ],
                ),
                call_stmt("print", vec![string("sum = "), var("sum")]),
            ],
        )],
    }
}

fn main() {
    let opt = Opt::from_args();
    let level = if opt.verbose { Level::Trace } else { Level::Info };
    simple_logger::init_with_level(level).expect("failed to initialize logger");

    let program = demo_program();
    let mut host = StdHost;
    if let Err(err) = brewin_core::run(&program, &mut host) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
