use crate::cli::{Cli, Command};

pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.cmd {
        Command::Extract {
            pipeline,
            input,
            limit,
        } => crate::commands::extract::cmd_extract(&pipeline, &input, config, limit, cli.json),
        Command::Fit {
            vocab,
            pipeline,
            input,
        } => crate::commands::fit::cmd_fit(&vocab, &pipeline, &input, config, cli.json),
        Command::Vectorize {
            strategy,
            vocab,
            buckets,
            signed,
            no_signed,
            dense,
            pipeline,
            input,
        } => crate::commands::vectorize::cmd_vectorize(
            crate::commands::vectorize::VectorizeArgs {
                strategy,
                vocab,
                buckets,
                signed: crate::cli::switch(signed, no_signed),
                dense,
            },
            &pipeline,
            &input,
            config,
            cli.json,
        ),
        Command::Inspect { vocab, limit } => {
            crate::commands::inspect::cmd_inspect(&vocab, limit, cli.json)
        }
    }
}
