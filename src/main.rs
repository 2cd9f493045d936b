use price_reconciler::{io, AppConfig, Reconciler};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting reconciliation with config: {:?}", config);

    let reconciler = Reconciler::new(config.pricing.clone())?;

    // 读取两份导出
    let listings = io::read_listings_file(&config.input.listings_path)?;
    let inventory = io::read_inventory_file(&config.input.inventory_path)?;

    // 关联 + 定价
    let report = reconciler.run(&listings, &inventory);

    // 导出结果
    io::export_to_csv(&report.result_rows(), report.layout, &config.output.path)?;

    println!("{}", serde_json::to_string_pretty(&report.stats)?);
    Ok(())
}
