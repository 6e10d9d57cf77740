//! Interactive overrides for `mktscrape reddit --interactive`.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use mktscrape_core::{Direction, RedditChoice, RedditRunConfig};

/// Ask which data to collect and, optionally, for every other setting.
/// Invalid answers are asked again; end of input is an error.
pub(crate) fn customize_reddit<R: BufRead, W: Write>(
    defaults: RedditRunConfig,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<RedditRunConfig> {
    let mut prompter = Prompter { input, output };
    let mut config = defaults;

    let code = prompter.choose(
        "Enter 0 for comment data, 1 for post data, or 2 for both: ",
        &[0, 1, 2],
    )?;
    config.choice = RedditChoice::from_code(code)?;

    let customize = prompter.choose(
        "Enter 0 to proceed with default configuration or 1 to customize configuration: ",
        &[0, 1],
    )?;
    if customize == 0 {
        return Ok(config);
    }

    config.n_stop = prompter.number("Max number of posts/comments to collect (0 for no limit): ")?;
    config.names_path = prompter.path("Enter path of names list (.CSV): ")?;
    config.column_name = prompter.text("Enter name of column that will be extracted: ")?;
    if config.choice.includes_comments() {
        config.comments_output_folder = prompter.path("Desired output folder for comment data: ")?;
    }
    if config.choice.includes_submissions() {
        config.submissions_output_folder = prompter.path("Desired output folder for post data: ")?;
    }
    let fetch = prompter.choose(
        "Enter 0 to only fetch newest data, otherwise enter 1: ",
        &[0, 1],
    )?;
    config.direction = Direction::from_fetch_newest(fetch == 0);

    Ok(config)
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;
        if read == 0 {
            anyhow::bail!("input closed before all questions were answered");
        }
        Ok(line.trim().to_string())
    }

    fn choose(&mut self, prompt: &str, valid: &[u8]) -> anyhow::Result<u8> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse::<u8>() {
                Ok(n) if valid.contains(&n) => return Ok(n),
                _ => {
                    let options: Vec<String> = valid.iter().map(ToString::to_string).collect();
                    writeln!(self.output, "Please enter {}.", options.join(" or "))?;
                }
            }
        }
    }

    fn number(&mut self, prompt: &str) -> anyhow::Result<usize> {
        loop {
            match self.ask(prompt)?.parse::<usize>() {
                Ok(n) => return Ok(n),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    fn text(&mut self, prompt: &str) -> anyhow::Result<String> {
        loop {
            let answer = self.ask(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "A value is required.")?;
        }
    }

    fn path(&mut self, prompt: &str) -> anyhow::Result<PathBuf> {
        self.text(prompt).map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn defaults() -> RedditRunConfig {
        RedditRunConfig {
            names_path: PathBuf::from("config/names.csv"),
            column_name: "url".to_string(),
            comments_output_folder: PathBuf::from("data/comments"),
            submissions_output_folder: PathBuf::from("data/submissions"),
            direction: Direction::Backward,
            n_stop: 1000,
            choice: RedditChoice::Both,
        }
    }

    fn answer(script: &str) -> (anyhow::Result<RedditRunConfig>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = customize_reddit(defaults(), &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn keeping_defaults_only_sets_choice() {
        let (result, _) = answer("1\n0\n");
        let config = result.unwrap();
        assert_eq!(config.choice, RedditChoice::Submissions);
        assert_eq!(config.n_stop, 1000);
        assert_eq!(config.names_path, PathBuf::from("config/names.csv"));
    }

    #[test]
    fn customizing_asks_only_for_needed_folders() {
        let (result, output) = answer("0\n1\n250\nlists/bands.csv\nwebsite\nout/comments\n0\n");
        let config = result.unwrap();
        assert_eq!(config.choice, RedditChoice::Comments);
        assert_eq!(config.n_stop, 250);
        assert_eq!(config.names_path, PathBuf::from("lists/bands.csv"));
        assert_eq!(config.column_name, "website");
        assert_eq!(config.comments_output_folder, PathBuf::from("out/comments"));
        assert_eq!(
            config.submissions_output_folder,
            PathBuf::from("data/submissions")
        );
        assert_eq!(config.direction, Direction::Forward);
        assert!(!output.contains("post data:"));
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let (result, output) = answer("7\nboth\n2\n0\n");
        assert_eq!(result.unwrap().choice, RedditChoice::Both);
        assert_eq!(output.matches("Please enter 0 or 1 or 2.").count(), 2);
    }

    #[test]
    fn closed_input_is_an_error() {
        let (result, _) = answer("2\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
