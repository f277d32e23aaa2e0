use anyhow::Result;
use clap::Parser;
use pieboard::board::cozy::Referee;
use pieboard::{BoardConfig, BoardCoordinator, Color, DropSource, DropTarget, Square};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Terminal chessboard with premoves against a random-move opponent",
    long_about = None
)]
struct Args {
    /// Board config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Allow queueing moves before your turn
    #[arg(long)]
    premoves: bool,

    /// Animation duration for opponent moves, in milliseconds
    #[arg(long)]
    animation_ms: Option<u64>,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Seed for the opponent's move choice
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

struct Session {
    board: BoardCoordinator,
    referee: Rc<RefCell<Referee>>,
    rng: SmallRng,
    human: Color,
}

impl Session {
    /// Confirms accepted human moves and lets the opponent reply.
    fn sync(&mut self) {
        let confirmed = self.referee.borrow().position();
        if self.board.manual_drop() && confirmed != *self.board.position() {
            self.board.set_position(confirmed);
        }
        if self.referee.borrow().side_to_move() == self.human || self.board.is_animating() { return; }
        let reply = self.referee.borrow_mut().play_random(&mut self.rng);
        match reply {
            Some((from, to, piece)) => {
                println!("Opponent plays: {piece} {from}{to}");
                let next = self.referee.borrow().position();
                self.board.set_position(next);
            }
            None => println!("Opponent has no legal moves."),
        }
    }

    fn drop_piece(&mut self, from: &str, to: &str) {
        let (Ok(from), Ok(to)) = (from.parse::<Square>(), to.parse::<Square>()) else {
            println!("Invalid squares! Use format like 'd e2 e4'");
            return;
        };
        let Some(piece) = self.board.position().get(from) else {
            println!("No piece on {from}");
            return;
        };
        self.board.handle_drop(DropSource::Square(from), DropTarget::Square(to), piece);
    }

    fn print(&self) {
        println!("\n{}", self.board.position());
        let premoves: Vec<String> = self.board.premoves().map(|p| format!("{}{}", p.source, p.target)).collect();
        println!(
            "{} to move | animating: {} | premoves: [{}]",
            if self.referee.borrow().side_to_move() == Color::White { "White" } else { "Black" },
            self.board.is_animating(),
            premoves.join(" ")
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human = parse_color(&args.color)?;

    let mut config = match &args.config {
        Some(path) => BoardConfig::from_json_file(path)?,
        None => BoardConfig::default(),
    };
    if args.premoves { config.are_premoves_allowed = true; }
    if let Some(ms) = args.animation_ms { config.animation_duration_ms = ms; }

    let referee = match &args.fen {
        Some(fen) => Referee::from_fen(fen)?,
        None => Referee::startpos(),
    };
    let referee = Rc::new(RefCell::new(referee));
    let start = referee.borrow().position();
    let r = Rc::clone(&referee);
    let board = BoardCoordinator::new(config, start)
        .with_drop_validator(move |source, target, piece| r.borrow_mut().try_drop(source, target, piece))
        .with_position_observer(|pos| log::debug!("board now {}", pos.to_notation()));

    let mut session = Session { board, referee, rng: SmallRng::seed_from_u64(args.seed), human };

    println!("Commands: d <from> <to> | t [ms] | c (clear premoves) | r <square> | p | quit");
    session.sync();
    session.print();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["d", from, to] => session.drop_piece(from, to),
            ["t"] => {
                let ms = session.board.config().animation_duration_ms;
                session.board.advance(Duration::from_millis(ms));
            }
            ["t", ms] => match ms.parse::<u64>() {
                Ok(ms) => session.board.advance(Duration::from_millis(ms)),
                Err(_) => println!("Invalid duration: {ms}"),
            },
            ["c"] => session.board.clear_premoves(),
            ["r", sq] => match sq.parse::<Square>() {
                Ok(sq) => session.board.handle_right_click(sq),
                Err(e) => println!("{e}"),
            },
            ["p"] => {}
            _ => {
                println!("Unknown command");
                continue;
            }
        }
        session.sync();
        session.print();
        if session.referee.borrow().legal_moves().is_empty() {
            println!("Game over.");
            break;
        }
    }

    Ok(())
}
