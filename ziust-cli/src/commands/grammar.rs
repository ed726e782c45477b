//! The `ziust grammar` command.

use ziust_grammar::GRAMMAR;

/// Print every rule of the grammar.
pub fn run() -> Result<(), String> {
    print!("{}", &*GRAMMAR);
    Ok(())
}
