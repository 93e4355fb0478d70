use crate::cli::build_repl;

const AFTER_HELP: &str = "\
Dates:
  today                the current day
  tomorrow, yesterday  one day after / before today
  3d, +3d, -1d         N days from today
  2w                   N weeks from today
  2025-08-01           YYYY-MM-DD (or YYYY/MM/DD)

Examples:
  add Pay rent --due 2025-08-01 -p high --tags home,bills --recur monthly
  list --pending --sort due
  list --overdue
  update 3 --due none --title Pay rent and water bill
  complete 3
  delete 3

Type '<command> --help' for the options of a single command.";

/// Text printed by the `help` console command.
pub fn help_text() -> String {
    let mut cmd = build_repl()
        .about("Commands are typed at the '>' prompt; ids are the numbers shown by 'list'.")
        .override_usage("<COMMAND> [ARGS]...")
        .after_help(AFTER_HELP);

    cmd.render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_has_examples() {
        let text = help_text();
        assert!(text.contains("Examples:"));
        assert!(text.contains("complete"));
        assert!(text.contains("YYYY-MM-DD"));
    }
}
