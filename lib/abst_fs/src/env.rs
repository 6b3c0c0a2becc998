use super::{generr, AbstPath, Error};

pub fn home_dir() -> Result<AbstPath, Error> {
    match dirs::home_dir() {
        Some(home_dir) => Ok(AbstPath::from(home_dir)),
        None => Err(generr(
            "unable to retrieve home directory path",
            "the platform reported no home directory",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::home_dir;

    #[test]
    fn home_dir_resolves() {
        // Not every CI sandbox has a home, but when it has one it is absolute
        if let Ok(home) = home_dir() {
            assert!(home.to_path_buf().is_absolute());
        }
    }
}
