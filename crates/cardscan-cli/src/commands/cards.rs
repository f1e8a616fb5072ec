//! Cards command - list stored cards page by page.

use clap::Args;
use console::style;

use cardscan_core::{CardStore, ContactRecord, Page};

use super::{OutputFormat, load_config, open_store};

/// Arguments for the cards command.
#[derive(Args)]
pub struct CardsArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// Cards per page (default from config)
    #[arg(short, long)]
    limit: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: CardsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let limit = args.limit.unwrap_or(config.listing.default_limit);
    let page = Page::new(args.page, limit).clamp_limit(config.listing.max_limit);

    let cards = store.list(page)?;
    let total = store.count()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Csv => print!("{}", format_csv(&cards)?),
        OutputFormat::Text => {
            if cards.is_empty() {
                println!("{} No cards on page {}", style("ℹ").blue(), page.page);
            }
            for card in &cards {
                println!(
                    "{:>4}  {}  {}",
                    style(card.id).bold(),
                    card.created_at.format("%Y-%m-%d %H:%M"),
                    display_or_dash(&card.fields.name)
                );
                println!(
                    "      {} | {} | {}",
                    display_or_dash(&card.fields.job_title),
                    display_or_dash(&card.fields.company_name),
                    display_or_dash(&card.fields.email)
                );
            }
            println!();
            println!(
                "Page {} ({} per page), {} cards stored",
                page.page, page.limit, total
            );
        }
    }

    Ok(())
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn format_csv(cards: &[ContactRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "name",
        "jobTitle",
        "companyName",
        "email",
        "phoneNumber",
        "address",
        "image",
        "createdAt",
    ])?;

    for card in cards {
        let fields = &card.fields;
        wtr.write_record([
            &card.id.to_string(),
            &fields.name,
            &fields.job_title,
            &fields.company_name,
            &fields.email,
            &fields.phone_number,
            &fields.address,
            &card.image,
            &card.created_at.to_rfc3339(),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
