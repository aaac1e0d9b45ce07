use snipquiz_core::domain::clock::format_clock;
use snipquiz_core::domain::{DisplayName, SongId};
use snipquiz_core::services::{RoundAdvance, SubmitError};
use snipquiz_lib::{QuizApp, QuizRuntime, init_tracing};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: play | skip | search <text> | select <id> | guess | next | status | rename <name> | submit | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing()?;

  let app = QuizApp::bootstrap().await?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  let name = match std::env::args().nth(1) {
    Some(name) => name,
    None => {
      println!("display name:");
      lines.next_line().await?.unwrap_or_default()
    }
  };

  let runtime = app.start_match(&name)?;
  println!("{HELP}");

  while let Some(line) = lines.next_line().await? {
    let (cmd, arg) = match line.trim().split_once(' ') {
      Some((cmd, arg)) => (cmd.to_string(), arg.trim().to_string()),
      None => (line.trim().to_string(), String::new()),
    };

    if cmd == "quit" {
      break;
    }
    handle(&runtime, &cmd, &arg).await;
  }

  Ok(())
}

async fn handle(runtime: &QuizRuntime, cmd: &str, arg: &str) {
  match cmd {
    "play" => match runtime.play() {
      Some(seconds) => println!("playing {seconds}s"),
      None => println!("nothing to play"),
    },
    "skip" => match runtime.skip() {
      Some(seconds) => println!("snippet is now {seconds}s ({} skips used)", runtime.round_view().skips_used),
      None => println!("no skips left"),
    },
    "search" => {
      for song in runtime.search(arg) {
        println!("  [{}] {song}", song.id);
      }
    }
    "select" => {
      let picked = arg.parse::<u32>().map(SongId::new).map(|id| runtime.select(id)).unwrap_or(false);
      println!("{}", if picked { "selected" } else { "not a candidate" });
    }
    "guess" => match runtime.guess() {
      Some(outcome) => println!("{outcome}"),
      None => println!("select a song first"),
    },
    "next" => match runtime.next_round() {
      Some(RoundAdvance::Started(view)) => println!("round {}", view.round_number),
      Some(RoundAdvance::Ended(reason)) => println!("{}", reason.message(runtime.snapshot().score)),
      None => println!("finish this round first"),
    },
    "status" => {
      let snap = runtime.snapshot();
      let clock = snap.time_remaining_seconds.map(|s| format_clock(s as f64)).unwrap_or_else(|| "--:--".into());
      println!("round {} | score {} | {clock}", snap.round_number, snap.score);
      if let Some(reason) = snap.ended {
        println!("{}", reason.message(snap.score));
      }
    }
    "rename" => match DisplayName::parse(arg) {
      Ok(name) if runtime.rename_player(name.clone()) => println!("renamed"),
      Ok(_) => println!("score already submitted"),
      Err(e) => println!("{e}"),
    },
    "submit" => match runtime.submit_score().await {
      Ok(ack) => println!("Score submitted successfully! ({} points)", ack.record.final_score),
      Err(SubmitError::Rejected(name)) => {
        println!("{name} is already taken. Please choose another one (rename <name>).")
      }
      Err(SubmitError::TimedOut(_)) => println!("The leaderboard is slow; the submission is still pending."),
      Err(e) => println!("Failed to submit score: {e}"),
    },
    _ => println!("{HELP}"),
  }
}
