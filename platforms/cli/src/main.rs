use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tmachine::types::INPUT_BLANK_SYMBOL;
use tmachine::{
    Execution, Program, ProgramLoader, ProgramManager, Tape, TuringMachineError, BLANK,
    DEFAULT_MAX_STEPS,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine definition file to execute (`.tm` or `.json`)
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<PathBuf>,

    /// Run a built-in program by name
    #[clap(short, long)]
    builtin: Option<String>,

    /// The initial tape, replacing the program's own (`_` is blank)
    #[clap(short, long)]
    input: Option<String>,

    /// Give up after this many steps
    #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// List the built-in programs and exit
    #[clap(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        for (i, name) in ProgramManager::list_program_names().iter().enumerate() {
            println!("{i}: {name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load(cli: &Cli) -> Result<Program, TuringMachineError> {
    match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(path),
        (None, Some(name)) => ProgramManager::get_program_by_name(name),
        (None, None) => Err(TuringMachineError::ValidationError(
            "Either --program or --builtin is required".to_string(),
        )),
    }
}

fn run(cli: &Cli) -> Result<(), TuringMachineError> {
    let program = load(cli)?;
    let machine = program.machine()?;
    let mut tape = cli
        .input
        .as_deref()
        .map(Tape::new)
        .unwrap_or_else(|| program.tape());

    {
        let mut execution = Execution::new(&machine, &mut tape)?;

        if cli.debug {
            print_state(&execution);

            while !execution.is_halted() {
                if execution.step_count() >= cli.max_steps {
                    return Err(TuringMachineError::StepLimitExceeded(cli.max_steps));
                }
                execution.step()?;
                print_state(&execution);
            }

            println!("\nMachine halted after {} steps.", execution.step_count());
            println!("\nFinal tape:");
        } else {
            execution.run_bounded(cli.max_steps)?;
        }
    }

    println!("{}", display_tape(&tape));
    println!("head: {}", tape.head());

    Ok(())
}

fn print_state(execution: &Execution) {
    println!(
        "Step: {}, State: {}, Head: {}, Tape: [{}]",
        execution.step_count(),
        execution.state(),
        execution.tape().head(),
        display_tape(execution.tape())
    );
}

/// Renders the visited span with blanks shown as `_`.
fn display_tape(tape: &Tape) -> String {
    tape.render()
        .into_iter()
        .map(|c| if c == BLANK { INPUT_BLANK_SYMBOL } else { c })
        .collect()
}
