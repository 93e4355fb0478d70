// Integration tests for the console loop: each test feeds a script of typed
// lines and checks what the user would see.

mod common;

use common::{run_script, run_script_with_store};
use todo_console::{Recurrence, TaskManager, TaskStore};

#[test]
fn test_add_and_list() {
    let mut manager = TaskManager::new();
    let output = run_script(
        &mut manager,
        "add Buy milk --due today -p h --tags shop\nadd Call mom --due 2024-05-09\nlist\nexit\n",
    );

    assert!(output.contains("Task 1 added."));
    assert!(output.contains("Task 2 added."));
    assert!(output.contains("[H] (Due today) [shop]"));
    assert!(output.contains("(due 1 days ago)"));
    assert!(output.contains("2 shown, 2 pending"));
    assert!(output.trim_end().ends_with("Goodbye!"));
    assert_eq!(manager.len(), 2);
}

#[test]
fn test_empty_title_is_rejected() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "add\nexit\n");

    assert!(output.contains("TITLE"));
    assert!(manager.is_empty());
}

#[test]
fn test_ids_strictly_increase() {
    let mut manager = TaskManager::new();
    run_script(&mut manager, "add one\nadd two\ndelete 2\nadd three\n");

    let ids: Vec<u32> = manager.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_delete_unknown_id_reports_not_found() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "add keep\ndelete 42\nlist\n");

    assert!(output.contains("Task 42 not found."));
    assert_eq!(manager.len(), 1);
}

#[test]
fn test_invalid_input_messages() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "delete abc\ndelete\nfly away\ncomplete 7\n");

    assert!(output.contains("Invalid task ID. Please provide a number."));
    assert!(output.contains("Usage: delete <id>"));
    assert!(output.contains("Unknown command: fly. Type 'help' for available commands."));
    assert!(output.contains("Task 7 not found."));
}

#[test]
fn test_flag_errors_skip_usage_block() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "add x --priority\nadd\nlist --pending --done\n");

    assert_eq!(output.matches("error:").count(), 3);
    assert!(!output.contains("Usage:"));
    assert!(!output.contains("For more information"));
    assert!(manager.is_empty());
}

#[test]
fn test_blank_lines_and_end_of_input() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "\n   \nadd last one");

    assert_eq!(manager.len(), 1);
    assert!(output.trim_end().ends_with("Goodbye!"));
}

#[test]
fn test_complete_recurring_spawns_successor() {
    let mut manager = TaskManager::new();
    let output = run_script(
        &mut manager,
        "add Pay rent --due 2024-05-01 --recur monthly\ncomplete 1\ncomplete 1\nlist --pending\n",
    );

    assert!(output.contains("Task 1 completed."));
    assert!(output.contains("Next occurrence scheduled as task 2:"));
    assert!(output.contains("Task 1 is already completed"));
    assert!(output.contains("(due in 22 days) ↻ monthly"));

    assert_eq!(manager.len(), 2);
    let successors: Vec<_> = manager.tasks().iter().filter(|t| !t.completed).collect();
    assert_eq!(successors.len(), 1);
    assert_eq!(successors[0].recurrence, Some(Recurrence::Monthly));
}

#[test]
fn test_update_and_show() {
    let mut manager = TaskManager::new();
    let output = run_script(
        &mut manager,
        "add Draft --desc first pass\n\
         update 1 --title Final draft --due tomorrow --tags work\n\
         show 1\n\
         update 1\n",
    );

    assert!(output.contains("Task 1 updated."));
    assert!(output.contains("Final draft"));
    assert!(output.contains("(due in 1 days)"));
    assert!(output.contains("details   first pass"));
    assert!(output.contains("Usage: update <id>"));
    assert_eq!(manager.get(1).unwrap().tags, vec!["work"]);
}

#[test]
fn test_undo_completion() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "add once\ndone 1\nlist --done\ncomplete 1 --undo\n");

    assert!(output.contains("  1 | ✔ | once"));
    assert!(output.contains("Task 1 marked as pending."));
    assert!(!manager.get(1).unwrap().completed);
}

#[test]
fn test_help_lists_commands() {
    let mut manager = TaskManager::new();
    let output = run_script(&mut manager, "help\n");

    for name in ["add", "list", "delete", "update", "complete", "exit"] {
        assert!(output.contains(name), "help is missing {name}");
    }
}

#[test]
fn test_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    {
        let mut store = TaskStore::open(&path).unwrap();
        let mut manager = store.load().unwrap();
        run_script_with_store(
            &mut manager,
            &mut store,
            "add Water plants --recur daily --due today\nadd Scratch\ndelete 2\ncomplete 1\n",
        );
    }

    let store = TaskStore::open(&path).unwrap();
    let mut manager = store.load().unwrap();
    assert_eq!(manager.len(), 2);
    assert!(manager.get(1).unwrap().completed);
    assert_eq!(manager.next_id(), 4);

    let output = run_script(&mut manager, "add After restart\n");
    assert!(output.contains("Task 4 added."));
}
