use clap::{Subcommand, ValueEnum};

use super::{show_page, spin, Context, ListArgs};
use crate::errors::ClientError;
use crate::models::{Part, PartRequest};
use crate::pipeline::{PartField, PartSortKey};
use crate::view::Mutation;

#[derive(Subcommand)]
pub enum PartsCommands {
    /// List the part catalog
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<PartSort>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Submit a part request
    Request {
        /// Free-text note for the manufacturer
        #[arg(long, default_value = "")]
        note: String,
        /// Requested line as PART_ID=QUANTITY, repeatable
        #[arg(long = "line", value_parser = line_arg, required = true)]
        lines: Vec<(String, i64)>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PartSort {
    Code,
    Name,
}

impl From<PartSort> for PartSortKey {
    fn from(sort: PartSort) -> Self {
        match sort {
            PartSort::Code => PartSortKey::Code,
            PartSort::Name => PartSortKey::Name,
        }
    }
}

/// Parse `PART_ID=QUANTITY`. Range checks happen in validation.
fn line_arg(input: &str) -> Result<(String, i64), String> {
    let (part, quantity) = input
        .split_once('=')
        .ok_or_else(|| format!("'{}' is not PART_ID=QUANTITY", input))?;
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a whole number", quantity.trim()))?;
    Ok((part.trim().to_string(), quantity))
}

pub async fn handle(ctx: &mut Context, command: PartsCommands) -> Result<(), ClientError> {
    ctx.require_session()?;
    let mut view = ctx.view::<Part>("parts");

    match command {
        PartsCommands::List {
            category,
            sort,
            list,
        } => {
            if let Some(category) = category {
                view.set_filter(PartField::Category, category);
            }
            list.apply(&mut view, sort.map(Into::into));
            spin("Loading parts...", view.reload(&ctx.client)).await?;
            show_page(ctx, &view)
        }
        PartsCommands::Request { note, lines } => {
            spin("Loading parts...", view.reload(&ctx.client)).await?;
            let request = PartRequest::from_lines(note, &lines, view.rows());
            let result = spin(
                "Submitting part request...",
                ctx.client.submit_part_request(&request, view.rows()),
            )
            .await;
            match result {
                Ok(Mutation::Entity(_)) | Ok(Mutation::Acknowledged) => {
                    ctx.notifier.success(format!(
                        "Part request with {} line(s) submitted",
                        request.details.len()
                    ));
                    Ok(())
                }
                Ok(Mutation::Unrecognized) => {
                    ctx.notifier
                        .info("Part request sent; the server reply was not understood");
                    Ok(())
                }
                Err(e) => {
                    ctx.notifier.error(e.user_message());
                    Err(e)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_arg() {
        assert_eq!(line_arg("12=3"), Ok(("12".to_string(), 3)));
        assert_eq!(line_arg(" 12 = -1 "), Ok(("12".to_string(), -1)));
        assert!(line_arg("12").is_err());
        assert!(line_arg("12=two").is_err());
    }
}
