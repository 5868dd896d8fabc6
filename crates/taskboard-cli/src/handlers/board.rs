use crate::cli::BoardAction;
use crate::context::FileBoard;
use crate::output;
use taskboard_domain::project;

pub fn handle(board: &FileBoard, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Show { search } => {
            let columns = board.columns();
            let view = project(board.tasks(), &columns, search.as_deref().unwrap_or_default());
            output::output_success(&view)
        }
    }
}
