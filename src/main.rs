use ring_cluster::config::NodeConfig;
use ring_cluster::node::bootstrap;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} [--master <host:port>] --nodes <n> --port <port> --id <node-id>",
            args[0]
        );
        eprintln!("Example: {} --nodes 3 --port 9009 --id 10", args[0]);
        eprintln!(
            "Example: {} --master localhost:9009 --nodes 3 --port 9010 --id 50",
            args[0]
        );

        std::process::exit(1);
    }

    let config = NodeConfig::from_args(&args[1..])?;

    if config.is_coordinator() {
        tracing::info!(
            "Starting node {} as coordinator of a {}-node ring",
            config.node_id,
            config.num_nodes
        );
    } else {
        tracing::info!(
            "Starting node {} as follower of {}",
            config.node_id,
            config.master_host_port
        );
    }

    // 1. Bind and join the ring (blocks until sealed):
    let running = bootstrap::bind(config).await?.start().await?;

    tracing::info!("Ring formed:");
    for node in running.ring.nodes() {
        tracing::info!("  - node {} at {}", node.node_id, node.host_port);
    }

    // 2. Spawn stats reporter:
    let stats_node = running.node.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));

        loop {
            interval.tick().await;
            let stats = stats_node.engine().stats().await;
            tracing::info!(
                "Store stats: {} value key(s), {} list key(s)",
                stats.values,
                stats.lists
            );
        }
    });

    tracing::info!("Serving on {}", running.local_addr());
    tracing::info!("Press Ctrl+C to shutdown");

    running.serve_forever().await
}
