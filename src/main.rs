use std::time::Duration;

use anyhow::bail;
use argh::FromArgs;
use futures::FutureExt;
use lineloop::{DEFAULT_PROMPT, EditorLines, ErrorCallback, Repl, SuccessCallback};

#[derive(FromArgs)]
/// Interactive command loop demo. Type `help` for the available commands,
/// `exit` to leave.
struct Args {
    /// prompt shown before each command
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    prompt: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut repl = Repl::new();
    repl.register("help", |_args| async {
        Ok("commands: help, echo, greet, fail, sleep, exit".to_string())
    })?;
    repl.register("echo", |args| async move { Ok(args.join(" ")) })?;
    repl.register("greet", |args| async move {
        if args.is_empty() {
            bail!("nobody to greet");
        }
        Ok(format!("hello, {}", args.join(" ")))
    })?;
    repl.register("fail", |_args| async { bail!("this command always fails") })?;
    repl.register("sleep", |args| async move {
        let secs: u64 = args.first().map(|s| s.parse()).transpose()?.unwrap_or(1);
        tokio::time::sleep(Duration::from_secs(secs)).await;
        Ok(format!("slept {secs}s"))
    })?;

    let on_success: SuccessCallback = Box::new(|outcome| {
        async move {
            println!("{}", outcome.value);
            Ok(())
        }
        .boxed()
    });
    let on_error: ErrorCallback = Box::new(|failure| {
        async move {
            eprintln!("{failure}");
            Ok(())
        }
        .boxed()
    });

    let mut provider = EditorLines::new()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(repl.run(&mut provider, &args.prompt, Some(on_success), Some(on_error)));
    Ok(())
}
