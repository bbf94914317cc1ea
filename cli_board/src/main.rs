use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, trace, warn};

use board_proto::{decode_update, ReducerRequest, TableUpdate};

mod app;
mod ui;

use app::{channel, BoardTerminal};

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the shared tabletop board", long_about = None)]
struct Cli {
    /// Address of the backend's subscription stream (table updates).
    #[arg(long, default_value = "127.0.0.1:43000")]
    endpoint: String,
    /// Address of the backend's reducer command listener.
    #[arg(long, default_value = "127.0.0.1:43001")]
    command_endpoint: String,
    /// Game this session attaches to.
    #[arg(long, default_value_t = 1)]
    game: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (log_tx, log_rx) = mpsc::channel::<String>();
    let log_writer_tx = log_tx.clone();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(move || ChannelWriter {
            sender: log_writer_tx.clone(),
        })
        .init();

    let cli = Cli::parse();
    info!("Connecting to board backend at {}", cli.endpoint);

    let (sender, receiver) = channel();
    let (command_tx, command_rx) = mpsc::channel::<ReducerRequest>();
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let command_endpoint = cli.command_endpoint.clone();
    let _command_handle =
        std::thread::spawn(move || run_command_pump(command_endpoint, command_rx));

    let game = cli.game;
    let _ui_handle = std::thread::spawn(move || -> color_eyre::Result<()> {
        let app = BoardTerminal::new(game, receiver, command_tx, shutdown_tx, log_rx)?;
        app.run()
    });

    loop {
        if shutdown_rx.try_recv().is_ok() {
            info!("Client requested shutdown");
            break;
        }
        match TcpStream::connect(&cli.endpoint).await {
            Ok(mut stream) => {
                info!("Connected. Streaming table updates. Press 'q' to exit.");
                if let Err(err) = pump_updates(&mut stream, &sender).await {
                    warn!("Connection error: {}", err);
                    info!("Reconnecting in 2 seconds...");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
            Err(err) => {
                warn!("Failed to connect: {}", err);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }

    Ok(())
}

async fn pump_updates(stream: &mut TcpStream, sender: &UnboundedSender<TableUpdate>) -> Result<()> {
    let mut len_buf = [0u8; 4];
    loop {
        stream.read_exact(&mut len_buf).await?;
        let len = u32::from_le_bytes(len_buf) as usize;
        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await?;
        let update = decode_update(&payload)?;
        trace!(?update, "table.update");
        if sender.send(update).is_err() {
            break;
        }
    }
    Ok(())
}

fn run_command_pump(endpoint: String, receiver: Receiver<ReducerRequest>) {
    for request in receiver {
        match send_command(&endpoint, &request) {
            Ok(_) => info!(?request, "reducer.sent"),
            Err(err) => warn!(?request, "Failed to send reducer request: {}", err),
        }
    }
}

fn send_command(endpoint: &str, request: &ReducerRequest) -> std::io::Result<()> {
    let mut stream = std::net::TcpStream::connect(endpoint)?;
    stream.write_all(request.command_line().as_bytes())?;
    Ok(())
}
