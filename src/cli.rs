use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "trader-editor",
    version,
    about = "Edit trader price, trader and id config files"
)]
pub struct Cli {
    /// JSON config file to edit
    pub file: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List entries, optionally filtered
    Show {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// List the products of one category
    Products {
        category: String,
        #[arg(long, short)]
        query: Option<String>,
    },
    AddCategory {
        name: String,
    },
    DeleteCategory {
        name: String,
    },
    AddTrader {
        #[command(flatten)]
        fields: TraderArgs,
    },
    /// Edit the first trader with this given name
    UpdateTrader {
        #[arg(value_name = "GIVEN_NAME")]
        target: String,
        #[command(flatten)]
        fields: TraderArgs,
    },
    DeleteTrader {
        given_name: String,
    },
    AddId {
        #[command(flatten)]
        fields: IdEntryArgs,
    },
    /// Edit the first entry with this id
    UpdateId {
        #[arg(value_name = "ID")]
        target_id: i64,
        #[command(flatten)]
        fields: IdEntryArgs,
    },
    DeleteId {
        id: i64,
    },
    AddProduct {
        category: String,
        /// classname,coefficient,maxStock,tradeQuantity,buyPrice,sellPrice
        product: String,
    },
    /// Replace the first product with this classname
    UpdateProduct {
        category: String,
        classname: String,
        /// classname,coefficient,maxStock,tradeQuantity,buyPrice,sellPrice
        product: String,
    },
    DeleteProduct {
        category: String,
        classname: String,
    },
    /// Rewrite the file in the canonical format
    Format,
}

/// Trader fields; anything left out keeps its current or template value
#[derive(Args, Debug, Default)]
pub struct TraderArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub given_name: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    /// "x y z"
    #[arg(long, allow_hyphen_values = true)]
    pub position: Option<String>,
    /// "x y z"
    #[arg(long, allow_hyphen_values = true)]
    pub orientation: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct IdEntryArgs {
    #[arg(long)]
    pub id: Option<String>,
    /// Category name; repeat for several
    #[arg(long = "category")]
    pub categories: Option<Vec<String>>,
}
