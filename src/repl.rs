use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::interpreter::Environment;
use crate::run_source;

/// Line-oriented read-eval-print loop.
///
/// Prints a literal `"> "` prompt before each read, evaluates the line
/// against the given persistent environment, and prints the rendered
/// result. A line of exactly `exit` (terminator stripped) ends the loop,
/// as does end of input. Errors are reported on the output stream and the
/// loop keeps going; the loop is the only recovery boundary.
pub fn repl<R, W>(mut input: R, mut output: W, env: &Rc<Environment>) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        output.write_all(b"> ")?;
        output.flush()?;
        let n = input.read_line(&mut line)?;
        if n == 0 {
            break;
        }
        let source = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if source == "exit" {
            break;
        }
        if !source.trim().is_empty() {
            match run_source(source, env) {
                Ok(rendered) => writeln!(output, "{}", rendered)?,
                Err(error) => writeln!(output, "error: {}", error)?,
            }
        }
        // read_line appends, so reset between lines
        line.clear();
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;
    use crate::interpreter::global_env;

    fn transcript(input: &str) -> String {
        let env = global_env();
        let mut output = Vec::new();
        repl(Cursor::new(input), &mut output, &env).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn evaluates_lines_against_one_environment() {
        let out = transcript("(define x 2)\n(+ x 3)\nexit\n");
        assert_eq!(out, "> 2\n> 5\n> ");
    }

    #[test]
    fn exit_ends_the_loop() {
        assert_eq!(transcript("exit\n(+ 1 1)\n"), "> ");
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        assert_eq!(transcript("(+ 1 1)\n"), "> 2\n> ");
    }

    #[test]
    fn errors_are_reported_and_the_loop_continues() {
        let out = transcript("(oops)\n(+ 1 1)\nexit\n");
        assert_eq!(out, "> error: undefined symbol: oops\n> 2\n> ");
    }

    #[test]
    fn parse_errors_are_reported_per_line() {
        let out = transcript("(\nexit\n");
        assert_eq!(out, "> error: unexpected end of input\n> ");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(transcript("\n   \n(+ 2 2)\nexit\n"), "> > > 4\n> ");
    }

    #[test]
    fn definitions_persist_across_lines() {
        let out = transcript("(define f (lambda (n) (* n n)))\n(f 6)\nexit\n");
        assert_eq!(out, "> <function>\n> 36\n> ");
    }
}
