use crate::cli::ColumnAction;
use crate::context::FileBoard;
use crate::handlers::parse_status;
use crate::output;

pub fn handle(board: &mut FileBoard, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::List => output::output_list(board.columns()),
        ColumnAction::Move { status, index } => {
            let status = parse_status(&status);
            let moved = board.reorder_column(status, index);
            output::output_success(serde_json::json!({
                "moved": moved,
                "columns": board.columns(),
            }))
        }
    }
}
