use clap::Subcommand;

use super::classify::ClassifyArgs;
use super::config::ConfigArgs;
use super::pick::PickArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Pick an element from an HTML file and print ranked selectors for it
    Pick(PickArgs),

    /// Show how the stability classifier judges an identifier
    Classify(ClassifyArgs),

    /// Print the effective pattern table
    Patterns,

    /// Manage selector-picker configuration
    Config(ConfigArgs),
}
