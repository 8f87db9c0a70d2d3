use std::io::{self, BufRead, Write};
use std::sync::Arc;
use weiqi::advisor::{MoveAdvisor, RandomAdvisor, RemoteAdvisor};
use weiqi::build_info;
use weiqi::config::Config;
use weiqi::game::MatchSnapshot;
use weiqi::storage::{FileMatchStore, InMemoryMatchStore, MatchStore};
use weiqi::{Lobby, LobbyError, Point, Seat, Stone, SystemClock, BOARD_SIZE};

fn main() -> io::Result<()> {
    let config = Config::from_env();
    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None | Some("play") | Some("--engine") => run_session(&config, wants_engine(&args)),
        Some("--version") | Some("-v") => {
            println!("{}", build_info::version_line());
            Ok(())
        }
        Some("--help") | Some("-h") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'weiqi --help' for usage.");
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!("Weiqi - 19x19 Go in the terminal\n");
    println!("Usage: weiqi [play [--engine]]\n");
    println!("Commands:");
    println!("  play        Two players at one terminal (default)");
    println!("  --version   Show version information");
    println!("  --help      Show this help message\n");
    println!("Options for play:");
    println!("  --engine    White is played by the move advisor (`weiqi --engine` also works)\n");
    println!("In a session: `x y` to place, `pass`, `hint`, `board`, `score`, `quit`.");
    println!("Environment: WEIQI_DATA_DIR, WEIQI_ADVISOR_URL, WEIQI_TIME_PER_PLAYER, WEIQI_LOG");
}

/// `--engine` anywhere after the program name.
fn wants_engine(args: &[String]) -> bool {
    args.iter().skip(1).any(|a| a == "--engine")
}

fn to_io(err: LobbyError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

fn build_lobby(config: &Config) -> io::Result<Lobby> {
    let store: Box<dyn MatchStore> = match &config.data_dir {
        Some(dir) => Box::new(FileMatchStore::new(dir)?),
        None => Box::new(InMemoryMatchStore::new()),
    };
    let advisor: Box<dyn MoveAdvisor> = match &config.advisor_url {
        Some(url) => Box::new(RemoteAdvisor::new(url.as_str())),
        None => Box::new(RandomAdvisor::new()),
    };
    Ok(Lobby::new(store, Arc::new(SystemClock), config.time_per_player).with_advisor(advisor))
}

fn render(snapshot: &MatchSnapshot) -> String {
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{:2} ", x));
    }
    out.push('\n');
    for (y, row) in snapshot.board.iter().enumerate() {
        out.push_str(&format!("{:2} ", y));
        for &cell in row {
            out.push_str(match cell {
                1 => " X ",
                2 => " O ",
                _ => " . ",
            });
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Captures  X: {}  O: {}    Clock  X: {}s  O: {}s\n",
        snapshot.captures_by_black,
        snapshot.captures_by_white,
        snapshot.black_time_left,
        snapshot.white_time_left
    ));
    out
}

fn parse_point(line: &str) -> Option<Point> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some(Point::new(x, y))
}

fn run_session(config: &Config, against_engine: bool) -> io::Result<()> {
    let lobby = build_lobby(config)?;
    let opponent = if against_engine {
        Seat::Engine
    } else {
        Seat::participant("white")
    };
    let (id, mut snapshot) = lobby.create_match(Some("black"), opponent).map_err(to_io)?;
    println!("Match {}", id);
    println!("{}", render(&snapshot));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !snapshot.game_over {
        let mover = if snapshot.next_player == Stone::Black { "X" } else { "O" };
        print!("{} to move> ", mover);
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let outcome = match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "board" => Ok(snapshot.clone()),
            "hint" => {
                match lobby.suggest_move(&id) {
                    Ok(Some(p)) => println!("Try {}", p),
                    Ok(None) => println!("Nothing worth playing; consider passing."),
                    Err(e) => eprintln!("{}", e),
                }
                continue;
            }
            "score" => {
                match lobby.score(&id) {
                    Ok(score) => println!("{:?}", score),
                    Err(e) => eprintln!("{}", e),
                }
                continue;
            }
            "pass" => lobby.pass(&id, None).map(|outcome| {
                if let Some(score) = outcome.score {
                    println!(
                        "Final score  X: {}  O: {}  winner: {}",
                        score.black_score, score.white_score, score.winner
                    );
                }
                outcome.snapshot
            }),
            other => match parse_point(other) {
                Some(point) => lobby.play_move(&id, None, point),
                None => {
                    eprintln!("Expected `x y`, `pass`, `hint`, `board`, `score` or `quit`.");
                    continue;
                }
            },
        };

        match outcome {
            Ok(next) => snapshot = next,
            Err(e) => {
                eprintln!("{}", e);
                snapshot = lobby.snapshot(&id).map_err(to_io)?;
                continue;
            }
        }

        if against_engine && !snapshot.game_over && snapshot.next_player == Stone::White {
            match lobby.engine_move(&id) {
                Ok(next) => snapshot = next,
                Err(e) => eprintln!("Engine could not move: {}", e),
            }
        }
        println!("{}", render(&snapshot));
    }

    if let Some(loser) = snapshot.timed_out {
        println!("{} ran out of time.", loser);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_flag_with_or_without_play() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(wants_engine(&args(&["weiqi", "--engine"])));
        assert!(wants_engine(&args(&["weiqi", "play", "--engine"])));
        assert!(!wants_engine(&args(&["weiqi", "play"])));
        assert!(!wants_engine(&args(&["weiqi"])));
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("3 4"), Some(Point::new(3, 4)));
        assert_eq!(parse_point(" 18   0 "), Some(Point::new(18, 0)));
        assert_eq!(parse_point("3"), None);
        assert_eq!(parse_point("3 4 5"), None);
        assert_eq!(parse_point("a b"), None);
    }

    #[test]
    fn test_render_marks_stones() {
        let mut snapshot_board = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
        snapshot_board[0][1] = 1;
        snapshot_board[0][2] = 2;
        let lobby = Lobby::new(
            Box::new(InMemoryMatchStore::new()),
            Arc::new(SystemClock),
            60,
        );
        let (_, mut snapshot) = lobby.create_match(None, Seat::Engine).unwrap();
        snapshot.board = snapshot_board;
        let text = render(&snapshot);
        assert!(text.lines().nth(1).unwrap().starts_with(" 0  .  X  O "));
    }
}
