use super::{ensure_parent, error_context, inerr, unkext, wrgobj, AbstPath, Error, ObjectType};

use serde::{de::DeserializeOwned, Serialize};

/// Encodings picked from the file extension
#[derive(Debug, PartialEq)]
enum Ext {
    Bin,
    Toml,
}
fn get_ext(path: &AbstPath) -> Option<Ext> {
    match path.extension()?.to_ascii_lowercase().as_str() {
        "bin" => Some(Ext::Bin),
        "toml" => Some(Ext::Toml),
        _ => None,
    }
}

/// Deserialize a `T` from the file at `path`, decoding it according to the
/// file extension
pub fn load<T: DeserializeOwned>(path: &AbstPath) -> Result<T, Error> {
    let errctx = error_context(format!("could not load file at path {}", path));
    let ext = get_ext(path).ok_or_else(|| unkext(path))?;
    if path.object_type() != Some(ObjectType::File) {
        return Err(wrgobj(errctx("open file"), ObjectType::File, path));
    }

    match ext {
        Ext::Toml => {
            let serialized = std::fs::read_to_string(path.to_path_buf())
                .map_err(inerr(errctx("read content to string")))?;
            toml::from_str(&serialized).map_err(inerr(errctx("deserialize content from toml")))
        }
        Ext::Bin => {
            let file =
                std::fs::File::open(path.to_path_buf()).map_err(inerr(errctx("open file")))?;
            bincode::deserialize_from(std::io::BufReader::new(file))
                .map_err(inerr(errctx("deserialize content from binary")))
        }
    }
}

/// Serialize `content` to the file at `path`, encoding it according to the
/// file extension and creating missing parent directories
pub fn save<T: Serialize>(path: &AbstPath, content: &T) -> Result<(), Error> {
    let errctx = error_context(format!("could not save file at path {}", path));
    let serialized = match get_ext(path).ok_or_else(|| unkext(path))? {
        Ext::Toml => toml::to_string(content)
            .map_err(inerr(errctx("serialize content to toml")))?
            .into_bytes(),
        Ext::Bin => {
            bincode::serialize(content).map_err(inerr(errctx("serialize content to binary")))?
        }
    };
    ensure_parent(path)?;
    std::fs::write(path.to_path_buf(), serialized).map_err(inerr(errctx("write content to file")))
}

#[cfg(test)]
mod tests {
    use super::{get_ext, load, save, AbstPath, Ext};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct TestStruct {
        name: String,
        count: u64,
        children: Vec<TestStruct>,
    }
    impl Default for TestStruct {
        fn default() -> Self {
            TestStruct {
                name: String::from("root"),
                count: 2,
                children: vec![
                    TestStruct {
                        name: String::from("a.txt"),
                        count: 1,
                        children: Vec::new(),
                    },
                    TestStruct {
                        name: String::from("d"),
                        count: 1,
                        children: Vec::new(),
                    },
                ],
            }
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(get_ext(&AbstPath::from("a/file.bin")), Some(Ext::Bin));
        assert_eq!(get_ext(&AbstPath::from("a/file.TOML")), Some(Ext::Toml));
        assert_eq!(get_ext(&AbstPath::from("a/file.txt")), None);
        assert_eq!(get_ext(&AbstPath::from("a/file")), None);
    }

    #[test]
    fn roundtrip() {
        let sandbox = tempfile::TempDir::new().unwrap();
        let root = AbstPath::from(sandbox.path());

        for name in ["nested/file.bin", "nested/file.toml"] {
            let file = root.append(&AbstPath::from(name));
            assert!(load::<TestStruct>(&file).is_err());
            save(&file, &TestStruct::default()).unwrap();
            assert_eq!(load::<TestStruct>(&file).unwrap(), TestStruct::default());
        }

        let file_txt = root.add_last("file.txt");
        assert!(save(&file_txt, &TestStruct::default()).is_err());
        std::fs::write(
            file_txt.to_path_buf(),
            bincode::serialize(&TestStruct::default()).unwrap(),
        )
        .unwrap();
        assert!(load::<TestStruct>(&file_txt).is_err());

        // a directory named like a snapshot
        let dir_bin = root.add_last("dir.bin");
        std::fs::create_dir(dir_bin.to_path_buf()).unwrap();
        assert!(load::<TestStruct>(&dir_bin).is_err());
    }
}
