//! # paramset demo application
//!
//! A small program that declares a few parameters and prints where each
//! value came from. It exists to demonstrate and manually check paramset's
//! features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example paramset_demo -- -port 8080 -v
//! cargo run --example paramset_demo -- -help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                   |
//! |------------------------|----------------------------------------------------------------------|
//! | Command line           | `cargo run --example paramset_demo -- --host=example.org -v`         |
//! | Environment            | `PARAMSET_DEMO_PORT=9000 cargo run --example paramset_demo`          |
//! | Config file (cwd)      | Put `color = blue` in `./paramset-demo.params`                       |
//! | Config file (platform) | Put lines in `params` under the platform config dir                  |
//! | Group config file      | Put `port = 1234` in `~/.paramset-demo/server.params`                |
//! | Program-scoped line    | `paramset-demo/verbose` in any of the files above                    |
//! | Suggestions            | `cargo run --example paramset_demo -- -prot 1`                       |
//! | Final check            | `cargo run --example paramset_demo -- -port 0`                       |
//! | Remainder              | `cargo run --example paramset_demo -- -v -- a b c`                   |
//! | Logging                | `PARAMSET_DEMO_LOG=trace cargo run --example paramset_demo`          |

mod setters;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use paramset::{
    Attributes, ConfigFile, ErrMap, FileLocation, Helper, NullRemHandler, Param, ParamOpt,
    ParamSet,
};

use setters::{Choice, Flag, Number, Text};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

/// Adds `-help`, prints usage when asked and exits on errors.
struct DemoHelper {
    show_help: Rc<Cell<bool>>,
}

impl Helper for DemoHelper {
    fn add_params(&mut self, ps: &mut ParamSet) {
        ps.add(
            "help",
            Box::new(Flag(self.show_help.clone())),
            "show this message and exit",
            vec![
                ParamOpt::alt_names(&["h"]),
                ParamOpt::attrs(Attributes::COMMAND_LINE_ONLY | Attributes::DONT_SHOW_IN_STD_USAGE),
            ],
        );
    }

    fn process_args(&mut self, ps: &mut ParamSet) {
        if self.show_help.get() {
            self.help(ps, &[]);
            std::process::exit(0);
        }
    }

    fn error_handler(&mut self, ps: &ParamSet, errs: &ErrMap) {
        if let Err(e) = errs.report(&mut std::io::stderr(), ps.prog_name()) {
            eprintln!("{}: cannot report errors: {e}", ps.prog_name());
        }
        std::process::exit(1);
    }

    fn help(&mut self, ps: &ParamSet, messages: &[String]) {
        println!("usage: {} [parameters] [-- args...]", ps.prog_name());
        for (name, group) in ps.groups() {
            if group.all_hidden() {
                continue;
            }
            println!();
            match group.description {
                Some(desc) => println!("{name}: {desc}"),
                None => println!("{name}:"),
            }
            for p in &group.params {
                if p.has_attr(Attributes::DONT_SHOW_IN_STD_USAGE) {
                    continue;
                }
                let names: Vec<String> = p.all_names().map(|n| format!("-{n}")).collect();
                println!("  {}  ({})", names.join(", "), p.allowed_values());
                println!("      {} [now: {}]", p.description(), p.current_value());
            }
        }
        for note in ps.notes() {
            println!();
            println!("{}:\n  {}", note.name, note.text);
        }
        for msg in messages {
            println!("{msg}");
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

const COLORS: &[&str] = &["red", "green", "yellow", "blue"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("PARAMSET_DEMO_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let verbose = Rc::new(Cell::new(false));
    let color = Rc::new(RefCell::new(String::from("yellow")));
    let host = Rc::new(RefCell::new(String::from("127.0.0.1")));
    let port = Rc::new(Cell::new(3000u16));

    let mut ps = ParamSet::builder()
        .program_name("paramset-demo")
        .helper(DemoHelper {
            show_help: Rc::new(Cell::new(false)),
        })
        .rem_handler(NullRemHandler)
        .env_prefix("PARAMSET_DEMO_")
        .config_file(ConfigFile::at(FileLocation::Platform("params".into())))
        .config_file(ConfigFile::at(FileLocation::Cwd("paramset-demo.params".into())).strict())
        .build();

    ps.add_note(
        "Sources",
        "values are read from config files, then PARAMSET_DEMO_* variables, \
         then the command line; the last one wins",
    );

    ps.add(
        "verbose",
        Box::new(Flag(verbose.clone())),
        "print every source that set each parameter",
        vec![ParamOpt::alt_names(&["v"]), ParamOpt::see_note(&["Sources"])],
    );
    ps.add(
        "color",
        Box::new(Choice {
            dest: color.clone(),
            allowed: COLORS,
        }),
        "colour of the output",
        vec![ParamOpt::alt_names(&["colour"])],
    );

    ps.set_group_description("server", "where the server listens");
    ps.add(
        "host",
        Box::new(Text(host.clone())),
        "host name to bind to",
        vec![ParamOpt::group("server"), ParamOpt::see_also(&["port"])],
    );
    ps.add(
        "port",
        Box::new(Number(port.clone())),
        "port to listen on",
        vec![ParamOpt::group("server")],
    );
    ps.add_group_config_file(
        "server",
        ConfigFile::at(FileLocation::Home(".paramset-demo".into(), "server.params".into())),
    );

    let check_port = port.clone();
    ps.add_final_check(move || {
        if check_port.get() == 0 {
            return Err("the port must not be 0".into());
        }
        Ok(())
    });

    ps.parse(std::env::args().skip(1));

    println!("color = {}", color.borrow());
    println!("host  = {}", host.borrow());
    println!("port  = {}", port.get());

    if verbose.get() {
        println!();
        for p in ps.params() {
            for src in p.sources() {
                println!("{}: {src}", p.name());
            }
        }
        for (name, locations) in ps.unused_params() {
            for loc in locations {
                println!("unused: {name} at {loc}");
            }
        }
    }

    if !ps.remainder().is_empty() {
        println!("extra arguments: {}", ps.remainder().join(" "));
    }
}
