use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "HASHNEST_PASSWORD";

/// Reads the password to check against a stored hash.
pub fn read_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env_or_pipe()? {
        return Ok(pw);
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

/// Reads a password to hash, asking twice when prompting on a terminal.
pub fn read_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env_or_pipe()? {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        bail!("password cannot be empty");
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn from_env_or_pipe() -> Result<Option<Zeroizing<String>>> {
    //  Environment Variable
    //  HASHNEST_PASSWORD="supersecret" hashnest hash
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Some(Zeroizing::new(pw)));
        }
    }

    //  stdin (Pipeline)
    //  printf "%s" "$PW" | hashnest verify '$argon2id$...'
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(Some(buf));
        }
    }

    Ok(None)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_newline_strips_line_endings_only() {
        let mut s = String::from("pass word \r\n");
        trim_newline(&mut s);
        assert_eq!(s, "pass word ");
    }
}
