use crate::cli::{TaskAction, TaskAddArgs, TaskEditArgs, TaskListArgs};
use crate::context::FileBoard;
use crate::handlers::{parse_priority, parse_status};
use crate::output;
use taskboard_domain::search::{CompositeSearcher, SearchBy, TaskSearcher, TitleSearcher};
use taskboard_domain::{Task, TaskId};

pub fn handle(board: &mut FileBoard, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Add(args) => add(board, args),
        TaskAction::List(args) => list(board, args),
        TaskAction::Get { id } => match board.get(&TaskId::new(id.as_str())) {
            Some(task) => output::output_success(task),
            None => output::output_error(&format!("Task not found: {}", id)),
        },
        TaskAction::Edit(args) => edit(board, args),
        TaskAction::Move { id, status } => {
            let id = TaskId::new(id);
            let moved = board.move_task(&id, &status);
            output::output_success(serde_json::json!({
                "id": id,
                "moved": moved,
                "task": board.get(&id),
            }))
        }
        TaskAction::Delete { id } => {
            let id = TaskId::new(id);
            board.delete_task(&id);
            output::output_success(serde_json::json!({ "deleted": id }))
        }
    }
}

fn add(board: &mut FileBoard, args: TaskAddArgs) -> anyhow::Result<()> {
    let status = parse_status(&args.status);
    let priority = args.priority.as_deref().map(parse_priority);

    let mut task = board
        .add_task(status, &args.title, &args.description)
        .unwrap_or_else(|e| output::output_error(&e.to_string()));
    if priority.is_some() {
        task = task.with_priority(priority);
        board.update_task(task.clone())?;
    }
    output::output_success(&task)
}

fn list(board: &FileBoard, args: TaskListArgs) -> anyhow::Result<()> {
    let status = args.status.as_deref().map(parse_status);
    let query = args.search.unwrap_or_default();
    let searcher = if args.title_only {
        CompositeSearcher::new().with_search(SearchBy::Title(TitleSearcher::new(query)))
    } else {
        CompositeSearcher::all(query)
    };

    let tasks: Vec<&Task> = board
        .tasks()
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .filter(|t| searcher.matches(t))
        .collect();
    output::output_list(tasks)
}

fn edit(board: &mut FileBoard, args: TaskEditArgs) -> anyhow::Result<()> {
    let id = TaskId::new(args.id.as_str());
    let Some(current) = board.get(&id) else {
        output::output_error(&format!("Task not found: {}", args.id));
    };

    let mut updated = current.clone();
    if let Some(title) = args.title {
        updated.title = title.trim().to_string();
    }
    if let Some(description) = args.description {
        updated.description = description.trim().to_string();
    }
    if args.clear_priority {
        updated.priority = None;
    } else if let Some(raw) = args.priority.as_deref() {
        updated.priority = Some(parse_priority(raw));
    }

    if let Err(e) = board.update_task(updated.clone()) {
        output::output_error(&e.to_string());
    }
    output::output_success(&updated)
}
