use anyhow::{anyhow, Result};
use std::io::{self, BufRead};

use eight_puzzle::{Board, Direction, Solution, Solver, SolverConfig, Status};

const USAGE: &str = "usage: eight-puzzle [--json] [--solvable] <board|random> [tile...]";

#[derive(Debug, Default)]
struct Args {
    json: bool,
    solvable: bool,
    board: Option<String>,
    moves: Vec<String>,
}

impl Args {
    fn parse<I: Iterator<Item = String>>(args: I) -> Result<Args> {
        let mut parsed = Args::default();

        for arg in args {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--solvable" => parsed.solvable = true,
                "-h" | "--help" => return Err(anyhow!(USAGE)),
                flag if flag.starts_with("--") => {
                    return Err(anyhow!("Unknown flag: {flag}\n{USAGE}"))
                }
                _ if parsed.board.is_none() => parsed.board = Some(arg.clone()),
                _ => parsed.moves.push(arg.clone()),
            }
        }

        Ok(parsed)
    }

    fn initial_board(&self) -> Result<Board> {
        match self.board.as_deref() {
            Some("random") => {
                let mut rng = rand::thread_rng();
                if self.solvable {
                    Ok(Board::random_solvable(&mut rng))
                } else {
                    Ok(Board::random(&mut rng))
                }
            }
            Some(board) => Ok(board.parse()?),
            None => {
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                Ok(line.parse()?)
            }
        }
    }
}

// A move is either a tile number or a single direction character
fn apply_move(board: &Board, instruction: &str) -> Result<Board> {
    if let Ok(tile) = instruction.parse::<u8>() {
        return Ok(board.try_move(tile)?);
    }

    let mut chars = instruction.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            let direction = Direction::try_from(c)?;
            board
                .slide(direction)
                .ok_or_else(|| anyhow!("Cannot slide {direction:?} on\n{board}"))
        }
        _ => Err(anyhow!("Invalid move: {instruction}")),
    }
}

fn play(mut board: Board, moves: &[String]) -> Result<()> {
    for (i, instruction) in moves.iter().enumerate() {
        board = apply_move(&board, instruction)?;

        println!("Move {}: {instruction}", i + 1);
        print!("{board}");
        println!("Heuristic value: {}\n", board.heuristic());

        if board.is_goal() {
            println!("Solved in {} moves", i + 1);
            return Ok(());
        }
    }

    Ok(())
}

fn print_solution(solution: &Solution<Board>) {
    match solution.status {
        Status::Solved => {
            for (i, (pair, step)) in solution
                .path
                .windows(2)
                .zip(solution.steps.iter())
                .enumerate()
            {
                let tile = pair[1].tile_at(pair[0].blank_index());
                println!("Move {}: tile {tile} {step}", i + 1);
                print!("{}", pair[1]);
                println!("Heuristic value: {}\n", pair[1].heuristic());
            }

            println!(
                "Solved in {} moves after trying {} boards",
                solution.moves, solution.states_visited
            );
        }
        Status::Exhausted => {
            println!("All {} boards have been tried.", solution.states_visited);
            println!("That puzzle is impossible to solve. Best board found was:");
            print!("{}", solution.state);
            println!("Heuristic value: {}", solution.heuristic);
        }
        Status::Interrupted => {
            println!(
                "Stopped after trying {} boards. Best board found so far was:",
                solution.states_visited
            );
            print!("{}", solution.state);
            println!("Heuristic value: {}", solution.heuristic);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse(std::env::args().skip(1))?;
    let board = args.initial_board()?;

    log::info!("Initial board {}:\n{board}", board.key());

    if !args.moves.is_empty() {
        return play(board, &args.moves);
    }

    let mut solver = Solver::new(SolverConfig::from_env(), board);
    let solution = solver.solution();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("Initial board:");
        print!("{board}");
        println!("Heuristic value: {}\n", board.heuristic());
        print_solution(&solution);
    }

    Ok(())
}
