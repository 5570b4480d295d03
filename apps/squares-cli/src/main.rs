//! # Squares CLI
//!
//! A terminal front end for the shared squares board built on the squares SDK.
//! Every participant is a separate session over one in-memory store, so the
//! races a browser crowd would produce can be replayed and watched here.
//!
//! ## Board model
//!
//! ```text
//! board/<row>-<col>   →  { name, color, textColor }
//! locks/<name>        →  true once that participant locked in
//! axes/{top,left}     →  permutations of 0..=9, drawn once the board is full
//! settings/...        →  maxSelections, boardLocked, winners, scores
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::*;
use rand::seq::SliceRandom;
use rand::thread_rng;
use squares_core::{CellKey, Quarter, BOARD_SIZE, DEFAULT_TEXT_COLOR};
use squares_sdk::{
    quick, CellView, ClaimOutcome, Client, ClientConfig, CommitOutcome, MemoryStore, Prompt,
    ResetOutcome, Session,
};
use tracing_subscriber::EnvFilter;

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "squares-cli")]
#[command(about = "Shared squares board with conditional-write claim reconciliation")]
#[command(version)]
struct Cli {
    /// Log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Basic demo: two participants pick, lock in, and an admin draws the numbers
    Demo,
    /// Race: many participants lock in the same cell at once
    Race {
        /// Number of racing participants
        #[arg(long, default_value_t = 8)]
        players: usize,
        /// Contested cell, as row-col
        #[arg(long, default_value = "5-5")]
        cell: String,
        /// Simulated store latency in milliseconds
        #[arg(long, default_value_t = 2)]
        latency_ms: u64,
    },
    /// Fill: participants claim random cells until the board is full
    Fill {
        /// Number of participants
        #[arg(long, default_value_t = 5)]
        players: usize,
        /// Seed for the drawn numbers
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Interactive REPL for manual experimentation
    Interactive,
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn problem(text: &str) {
    println!("  {} {}", "!".bright_red(), text);
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(label: &str, color: &str, text_color: &str) -> ColoredString {
    let mut out = label.normal();
    if let Some((r, g, b)) = hex_rgb(color) {
        out = out.on_truecolor(r, g, b);
    }
    if let Some((r, g, b)) = hex_rgb(text_color) {
        out = out.truecolor(r, g, b);
    }
    out
}

fn show_board(session: &Session<MemoryStore>) {
    let axes = session.cache().axes();
    let top = axes.top_labels();
    let left = axes.left_labels();

    print!("\n     ");
    for label in &top {
        print!(" {:^5}", label.bright_cyan());
    }
    println!();

    for row in 0..BOARD_SIZE {
        print!("  {:>2} ", left[row as usize].bright_cyan());
        for col in 0..BOARD_SIZE {
            let Ok(key) = CellKey::new(row, col) else {
                continue;
            };
            let cell = match session.cell_view(&key) {
                CellView::Open => format!("{:^5}", "·").dimmed(),
                CellView::Pending => format!("{:^5}", "[*]").bright_yellow().bold(),
                CellView::Owned { cell, mine } => {
                    let label: String = cell.name.chars().take(5).collect();
                    let painted = paint(&format!("{:^5}", label), &cell.color, &cell.text_color);
                    if mine {
                        painted.bold()
                    } else {
                        painted
                    }
                }
            };
            print!(" {}", cell);
        }
        println!();
    }

    let filled = session.cache().board().filled_count();
    println!(
        "\n  {} {}/100 filled{}",
        "▪".bright_white(),
        filled,
        if session.gate().board_locked() {
            format!("  {}", "LOCKED".bright_red().bold())
        } else {
            String::new()
        }
    );
}

fn show_leaderboard(session: &Session<MemoryStore>) {
    let counts = session.name_counts();
    if counts.is_empty() {
        println!("  {}", "(no selections)".dimmed());
        return;
    }
    for (name, count) in counts {
        println!("  {:<12} {}", name.bright_white(), count.to_string().bright_green());
    }
}

fn show_quarters(session: &Session<MemoryStore>) {
    let settings = session.gate().settings();
    for quarter in Quarter::ALL {
        println!(
            "  {}  winner: {:<12} score: {}",
            quarter.to_string().to_uppercase().bright_cyan(),
            settings.winner_label(quarter),
            settings.scores.get(quarter).unwrap_or("")
        );
    }
}

fn show_commit(name: &str, outcome: &CommitOutcome) {
    match outcome {
        CommitOutcome::Settled(report) => {
            let mark = if report.conflicts.is_empty() {
                "✓".bright_green()
            } else {
                "≠".bright_yellow()
            };
            println!("  {} {}: {}", mark, name.bright_magenta(), report.message());
        }
        CommitOutcome::Cancelled => step(&format!("{}: lock-in cancelled", name)),
    }
}

fn single_owner_result(owned: bool) {
    if owned {
        println!(
            "\n  {} {}",
            "✓".bright_green().bold(),
            "EXACTLY ONE OWNER, every other lock-in saw a conflict!"
                .bright_green()
                .bold()
        );
    } else {
        println!(
            "\n  {} {}",
            "✗".bright_red().bold(),
            "OWNERSHIP MISMATCH, the store and the reports disagree!"
                .bright_red()
                .bold()
        );
    }
}

async fn pick(session: &mut Session<MemoryStore>, keys: &[&str]) {
    let name = session
        .participant()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    for key in keys {
        let Ok(key) = key.parse::<CellKey>() else {
            continue;
        };
        match session.toggle_claim(key).await {
            Ok(outcome) => step(&format!("{} picks {}  {}", name, key, outcome.message().dimmed())),
            Err(err) => problem(&format!("{} picks {}: {}", name, key, err)),
        }
    }
}

// ─── Demo ──────────────────────────────────────────────────────────────────

async fn run_demo() {
    header("DEMO: Picking, Locking In, Drawing Numbers");
    let client = Client::in_memory(ClientConfig::default());

    section("Phase 1: Two participants pick cells locally");
    let mut players = match quick::create_players(&client, &["alice", "bob"]) {
        Ok(players) => players,
        Err(err) => return problem(&err.to_string()),
    };
    let mut bob = players.remove(1);
    let mut alice = players.remove(0);

    pick(&mut alice, &["0-0", "2-3", "4-4"]).await;
    pick(&mut bob, &["4-4", "9-9"]).await;
    step("Nothing is shared yet: pending picks live in each session");
    show_board(&alice);

    section("Phase 2: Bob locks in first, Alice second");
    match bob.commit_pending().await {
        Ok(outcome) => show_commit("Bob", &outcome),
        Err(err) => problem(&err.to_string()),
    }
    match alice.commit_pending().await {
        Ok(outcome) => show_commit("Alice", &outcome),
        Err(err) => problem(&err.to_string()),
    }
    alice.refresh();
    step(&format!(
        "Alice still has {} pending (lost 4-4 to Bob)",
        alice.pending_count()
    ));
    if let Ok(lost) = "4-4".parse::<CellKey>() {
        alice.discard_pending(&lost);
    }
    show_board(&alice);

    section("Phase 3: The house fills the rest, the admin draws numbers");
    let mut house = client.participant_session();
    let _ = house.enter("house", "#e5e7eb", DEFAULT_TEXT_COLOR);
    let mut admin = client.admin_session();
    if let Err(err) = admin.set_max_selections(100).await {
        return problem(&err.to_string());
    }
    house.refresh();
    let open: Vec<CellKey> = CellKey::all()
        .filter(|key| house.cache().board().is_open(key))
        .collect();
    for key in open {
        let _ = house.toggle_claim(key).await;
    }
    match house.commit_pending().await {
        Ok(outcome) => show_commit("House", &outcome),
        Err(err) => problem(&err.to_string()),
    }

    admin.refresh();
    match admin.generate_axes().await {
        Ok(_) => step("Numbers drawn"),
        Err(err) => problem(&err.to_string()),
    }
    let _ = admin.set_winner(Quarter::Q1, "Alice").await;
    let _ = admin.set_score(Quarter::Q1, "7-3").await;

    alice.refresh();
    show_board(&alice);

    section("Leaderboard");
    show_leaderboard(&alice);

    section("Quarters");
    show_quarters(&alice);
}

// ─── Race ──────────────────────────────────────────────────────────────────

async fn run_race(players: usize, cell: &str, latency_ms: u64) {
    header("RACE: Concurrent Lock-Ins on One Cell");

    let key: CellKey = match cell.parse() {
        Ok(key) => key,
        Err(err) => return problem(&err.to_string()),
    };
    let store = Arc::new(MemoryStore::with_latency(Duration::from_millis(latency_ms)));
    let client = Client::new(store, ClientConfig::default());

    section(&format!("Phase 1: {} participants pick {}", players, key));
    let names: Vec<String> = (1..=players).map(|i| format!("racer{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let sessions = match quick::create_players(&client, &name_refs) {
        Ok(sessions) => sessions,
        Err(err) => return problem(&err.to_string()),
    };

    section("Phase 2: Everyone locks in at once");
    let mut handles = vec![];
    for mut session in sessions {
        handles.push(tokio::spawn(async move {
            let name = session.participant().map(|p| p.name.clone()).unwrap_or_default();
            let _ = session.toggle_claim(key).await;
            let outcome = session.commit_pending().await;
            (name, outcome)
        }));
    }

    let mut winners = vec![];
    for handle in handles {
        let Ok((name, outcome)) = handle.await else {
            continue;
        };
        match outcome {
            Ok(outcome) => {
                if let CommitOutcome::Settled(report) = &outcome {
                    if !report.committed.is_empty() {
                        winners.push(name.clone());
                    }
                }
                show_commit(&name, &outcome);
            }
            Err(err) => problem(&format!("{}: {}", name, err)),
        }
    }

    section("Phase 3: What the store says");
    let mut viewer = client.participant_session();
    viewer.refresh();
    let owner = viewer.cache().owner(&key).map(str::to_string);
    step(&format!("{} is owned by {}", key, owner.as_deref().unwrap_or("nobody")));
    single_owner_result(winners.len() == 1 && owner.as_ref() == winners.first());
}

// ─── Fill ──────────────────────────────────────────────────────────────────

async fn run_fill(players: usize, seed: Option<u64>) {
    header("FILL: Random Picks Until the Board Is Full");

    let client = Client::in_memory(ClientConfig {
        axis_seed: seed,
        ..Default::default()
    });

    let mut admin = client.admin_session();
    let players = players.max(1);
    let cap = (100 + players - 1) / players;
    if let Err(err) = admin.set_max_selections(cap as i64).await {
        return problem(&err.to_string());
    }

    let names: Vec<String> = (1..=players).map(|i| format!("player{}", i)).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut sessions = match quick::create_players(&client, &name_refs) {
        Ok(sessions) => sessions,
        Err(err) => return problem(&err.to_string()),
    };

    let mut rng = thread_rng();
    let mut round = 0;
    loop {
        round += 1;
        section(&format!("Round {}", round));
        let mut progress = false;
        for session in sessions.iter_mut() {
            session.refresh();
            let mut open: Vec<CellKey> = CellKey::all()
                .filter(|key| session.cache().board().is_open(key))
                .collect();
            open.shuffle(&mut rng);
            for key in open.into_iter().take(session.selections_left()) {
                let _ = session.toggle_claim(key).await;
            }
            if session.pending_count() == 0 {
                continue;
            }
            let name = session.participant().map(|p| p.name.clone()).unwrap_or_default();
            match session.commit_pending().await {
                Ok(outcome) => {
                    if let CommitOutcome::Settled(report) = &outcome {
                        progress |= !report.committed.is_empty();
                    }
                    show_commit(&name, &outcome);
                }
                Err(err) => problem(&format!("{}: {}", name, err)),
            }
            for key in session.pending().to_vec() {
                session.discard_pending(&key);
            }
        }

        admin.refresh();
        if admin.cache().board().is_full() || !progress {
            break;
        }
    }

    match admin.generate_axes().await {
        Ok(_) => step("Board full, numbers drawn"),
        Err(err) => problem(&err.to_string()),
    }
    admin.refresh();
    show_board(&admin);

    section("Leaderboard");
    show_leaderboard(&admin);
}

// ─── Interactive ───────────────────────────────────────────────────────────

fn ask(prompt: &Prompt) -> bool {
    print!("  {} {} [y/N] ", "?".bright_yellow(), prompt);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn run_interactive() {
    header("INTERACTIVE: Shared Squares Board");
    println!("  Type {} for commands.", "help".bright_cyan());

    let client = Client::in_memory(ClientConfig::default());
    let mut sessions: BTreeMap<String, Session<MemoryStore>> = BTreeMap::new();
    let mut admin = client.admin_session();
    admin.set_confirmer(ask);
    let mut current: Option<String> = None;

    loop {
        let prompt = current.as_deref().unwrap_or("nobody");
        print!("{} ", format!("squares({})>", prompt).bright_cyan().bold());
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() || input.is_empty() {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        for session in sessions.values_mut() {
            session.refresh();
        }
        admin.refresh();

        match parts[0] {
            "join" | "j" => {
                let Some(raw) = parts.get(1) else {
                    problem("Usage: join <name>");
                    continue;
                };
                let mut session = client.participant_session();
                session.set_confirmer(ask);
                let color = session.suggested_color();
                let entered = session
                    .enter(raw, &color, DEFAULT_TEXT_COLOR)
                    .map(|participant| participant.name.clone());
                match entered {
                    Ok(name) => {
                        step(&format!("{} joined", name.bright_magenta()));
                        sessions.insert(name.clone(), session);
                        current = Some(name);
                    }
                    Err(err) => problem(&err.to_string()),
                }
            }

            "as" => {
                match parts.get(1).and_then(|raw| squares_core::format_name(raw)) {
                    Some(name) if sessions.contains_key(&name) => current = Some(name),
                    _ => problem("Unknown participant, use join <name>"),
                }
            }

            "pick" | "p" => {
                let Some(session) = current.as_ref().and_then(|n| sessions.get_mut(n)) else {
                    problem("Join first: join <name>");
                    continue;
                };
                for raw in &parts[1..] {
                    match raw.parse::<CellKey>() {
                        Ok(key) => match session.toggle_claim(key).await {
                            Ok(ClaimOutcome::Cancelled) => {}
                            Ok(outcome) => step(&format!("{}: {}", key, outcome.message())),
                            Err(err) => problem(&format!("{}: {}", key, err)),
                        },
                        Err(err) => problem(&err.to_string()),
                    }
                }
            }

            "drop" => {
                let Some(session) = current.as_ref().and_then(|n| sessions.get_mut(n)) else {
                    problem("Join first: join <name>");
                    continue;
                };
                for raw in &parts[1..] {
                    if let Ok(key) = raw.parse::<CellKey>() {
                        if session.discard_pending(&key) {
                            step(&format!("{} dropped", key));
                        }
                    }
                }
            }

            "lock" | "l" => {
                let Some(session) = current.as_ref().and_then(|n| sessions.get_mut(n)) else {
                    problem("Join first: join <name>");
                    continue;
                };
                step(session.lock_in_label());
                let name = session.participant().map(|p| p.name.clone()).unwrap_or_default();
                match session.commit_pending().await {
                    Ok(outcome) => show_commit(&name, &outcome),
                    Err(err) => problem(&err.to_string()),
                }
            }

            "remove" | "rm" => {
                let Some(key) = parts.get(1).and_then(|raw| raw.parse::<CellKey>().ok()) else {
                    problem("Usage: remove <row-col>");
                    continue;
                };
                match admin.toggle_claim(key).await {
                    Ok(ClaimOutcome::Cancelled) => {}
                    Ok(outcome) => step(outcome.message()),
                    Err(err) => problem(&err.to_string()),
                }
            }

            "board" | "b" => match current.as_ref().and_then(|n| sessions.get(n)) {
                Some(session) => show_board(session),
                None => show_board(&admin),
            },

            "status" | "st" => {
                let Some(session) = current.as_ref().and_then(|n| sessions.get(n)) else {
                    problem("Join first: join <name>");
                    continue;
                };
                step(&format!(
                    "saved {} | pending {} | left {} of {}",
                    session.saved_count(),
                    session.pending_count(),
                    session.selections_left(),
                    session.max_allowed()
                ));
            }

            "who" | "w" => show_leaderboard(&admin),

            "draw" => match admin.generate_axes().await {
                Ok(_) => step("Numbers drawn"),
                Err(err) => problem(&err.to_string()),
            },

            "reset" => match admin.reset_board().await {
                Ok(ResetOutcome::Reset) => {
                    for session in sessions.values_mut() {
                        session.leave();
                    }
                    sessions.clear();
                    current = None;
                    step("Board reset");
                }
                Ok(ResetOutcome::Cancelled) => {}
                Err(err) => problem(&err.to_string()),
            },

            "freeze" => match admin.toggle_board_lock().await {
                Ok(true) => step("Board locked"),
                Ok(false) => step("Board unlocked"),
                Err(err) => problem(&err.to_string()),
            },

            "max" => {
                let Some(value) = parts.get(1).and_then(|raw| raw.parse::<i64>().ok()) else {
                    problem("Usage: max <1-100>");
                    continue;
                };
                match admin.set_max_selections(value).await {
                    Ok(max) => step(&format!("Max selections set to {}", max)),
                    Err(err) => problem(&err.to_string()),
                }
            }

            "winner" | "score" => {
                let Some(quarter) = parts.get(1).and_then(|raw| raw.parse::<Quarter>().ok()) else {
                    problem("Usage: winner|score <q1-q4> [value]");
                    continue;
                };
                let value = parts[2..].join(" ");
                let result = if parts[0] == "winner" {
                    admin.set_winner(quarter, &value).await
                } else {
                    admin.set_score(quarter, &value).await
                };
                if let Err(err) = result {
                    problem(&err.to_string());
                }
            }

            "quarters" | "q4s" => show_quarters(&admin),

            "quit" | "exit" | "q" => {
                println!("  {}", "Goodbye!".dimmed());
                break;
            }

            "help" | "h" | "?" => {
                println!("  join <name> | as <name> | pick <r-c>.. | drop <r-c>.. | lock | status");
                println!("  board | who | quarters");
                println!("  admin: remove <r-c> | draw | reset | freeze | max <n>");
                println!("         winner <q> [name] | score <q> [score] | quit");
            }

            other => {
                println!(
                    "  {} Unknown command '{}', type 'help'",
                    "?".bright_yellow(),
                    other
                );
            }
        }
    }
}

// ─── Entry point ───────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Demo => run_demo().await,
        Commands::Race {
            players,
            cell,
            latency_ms,
        } => run_race(players, &cell, latency_ms).await,
        Commands::Fill { players, seed } => run_fill(players, seed).await,
        Commands::Interactive => run_interactive().await,
    }
}
