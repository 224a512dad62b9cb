//! CLI binary for the Brigade kitchen and arena demos.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use brigade_bus::{LogListener, NotificationBus};
use brigade_pipeline::{
    standard_kitchen, Fighter, Monster, TokioScheduler, Weapon, DEFAULT_ANNOUNCE_DELAY,
};
use brigade_types::{Notification, Order, OrderKind};

#[derive(Parser)]
#[command(name = "brigade", version, about = "Chained-handler order pipeline demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an order through the kitchen chain and wait for the announcement
    Kitchen {
        /// Order kind to submit
        #[arg(long, value_enum, default_value = "special")]
        order: OrderKindArg,
    },

    /// Run the fighter-versus-monster arena
    Arena {
        /// Number of attacks to perform
        #[arg(long, default_value = "2")]
        rounds: u32,
    },
}

/// CLI-side adapter so brigade-types stays clap-free.
#[derive(Clone, Copy, ValueEnum)]
enum OrderKindArg {
    Sushi,
    Dessert,
    Special,
    Drink,
}

impl From<OrderKindArg> for OrderKind {
    fn from(arg: OrderKindArg) -> Self {
        match arg {
            OrderKindArg::Sushi => OrderKind::Sushi,
            OrderKindArg::Dessert => OrderKind::Dessert,
            OrderKindArg::Special => OrderKind::Special,
            OrderKindArg::Drink => OrderKind::Drink,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Kitchen { order } => cmd_kitchen(order.into()).await?,
        Commands::Arena { rounds } => cmd_arena(rounds)?,
    }
    Ok(())
}

async fn cmd_kitchen(kind: OrderKind) -> anyhow::Result<()> {
    let bus: NotificationBus<Notification> = NotificationBus::new();
    bus.subscribe(Arc::new(LogListener::new("front desk")));

    let scheduler = Arc::new(TokioScheduler::new());
    let chain = standard_kitchen(bus, scheduler, DEFAULT_ANNOUNCE_DELAY)?;

    let mut order = Order::new(kind);
    chain.process(&mut order)?;
    tracing::info!(
        kind = %order.kind(),
        total = order.grand_total(),
        finished = order.is_finished(),
        "traversal returned"
    );

    if order.is_finished() {
        // The announcement is deferred; stay alive until it fires.
        tokio::time::sleep(DEFAULT_ANNOUNCE_DELAY + Duration::from_millis(100)).await;
    }
    Ok(())
}

fn cmd_arena(rounds: u32) -> anyhow::Result<()> {
    let fighter = Fighter::new("Player 1", Weapon::new(50));
    fighter.bus().subscribe(Arc::new(LogListener::new("spectator")));

    let mut monster = Monster::new("Monster 1");
    monster.bus().subscribe(Arc::new(LogListener::new("medic")));

    for round in 1..=rounds {
        tracing::debug!(round, monster_hp = monster.hp(), "attacking");
        if !fighter.attack(&mut monster) {
            tracing::info!(monster = monster.name(), "monster defeated");
            break;
        }
    }
    Ok(())
}
