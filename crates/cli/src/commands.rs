use std::fs;

use anyhow::{Context, bail};
use cmdtree::flags::{FloatFlag, IntFlag, PathFlag, StringFlag};
use cmdtree::{BuildError, Cmd, CommandBuilder, FlagInfo, GroupBuilder};

pub fn greet() -> Result<Cmd, BuildError> {
    let mut builder = CommandBuilder::new("Print a greeting");
    let loud = builder.no_arg("--loud", FlagInfo::new().doc("Shout the greeting"));
    let times = builder.optional_with_default(
        "--times",
        IntFlag,
        1,
        FlagInfo::new().value_name("N").doc("How many times to greet"),
    );
    let name = builder.required_anon(
        StringFlag,
        FlagInfo::new().value_name("name").doc("Who to greet"),
    );
    builder.run(move || {
        let times = times.value();
        if times < 0 {
            bail!("--times must not be negative, got {times}");
        }
        let mut greeting = format!("Hello, {}!", name.value());
        if loud.value() {
            greeting = greeting.to_uppercase();
        }
        for _ in 0..times {
            println!("{greeting}");
        }
        Ok(())
    })
}

pub fn cat() -> Result<Cmd, BuildError> {
    let mut builder = CommandBuilder::new("Print a file");
    let file = builder.required(
        "--file",
        PathFlag,
        FlagInfo::new().value_name("PATH").doc("File to print"),
    );
    let numbered = builder.no_arg("--number", FlagInfo::new().doc("Number output lines"));
    builder.run(move || {
        let path = file.value();
        tracing::debug!(path = %path.display(), "reading file");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for (idx, line) in content.lines().enumerate() {
            if numbered.value() {
                println!("{:>6}  {line}", idx + 1);
            } else {
                println!("{line}");
            }
        }
        Ok(())
    })
}

/// Echo a command line instead of running it; tokens after `--` are passed
/// through even when they look like flags.
pub fn exec() -> Result<Cmd, BuildError> {
    let mut builder = CommandBuilder::new("Show how a wrapped command line would be passed on");
    let dry_run = builder.no_arg(
        "--dry-run",
        FlagInfo::new().doc("Prefix output with 'dry-run:'"),
    );
    let program = builder.required_anon(StringFlag, FlagInfo::new().value_name("program"));
    let args = builder.repeated_anon(
        StringFlag,
        FlagInfo::new().value_name("args").doc("Arguments for the program"),
    );
    builder.run(move || {
        let mut line = vec![program.value()];
        line.extend(args.values());
        if dry_run.value() {
            println!("dry-run: {}", line.join(" "));
        } else {
            println!("{}", line.join(" "));
        }
        Ok(())
    })
}

pub fn math() -> Result<Cmd, BuildError> {
    let mut sum = CommandBuilder::new("Add numbers");
    let terms = sum.repeated_anon(FloatFlag, FlagInfo::new().value_name("x"));
    let sum = sum.run(move || {
        println!("{}", terms.values().iter().sum::<f64>());
        Ok(())
    })?;

    let mut mean = CommandBuilder::new("Average numbers");
    let first = mean.required_anon(FloatFlag, FlagInfo::new().value_name("x"));
    let rest = mean.repeated_anon(FloatFlag, FlagInfo::new().value_name("more"));
    let mean = mean.run(move || {
        let mut values = vec![first.value()];
        values.extend(rest.values());
        println!("{}", values.iter().sum::<f64>() / values.len() as f64);
        Ok(())
    })?;

    GroupBuilder::new("Arithmetic on floating point numbers")
        .cmd("sum", sum)
        .cmd("mean", mean)
        .build()
}
