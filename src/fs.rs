//! File access at the edge of the crate. Nothing in the issuance path touches disk.

use std::path::Path;

use crate::cert::Certificate;
use crate::error::{CertAideError, Result};

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CertAideError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `contents` to `path`, replacing whatever was there.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| CertAideError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`write_file`], but the file ends up readable by its owner only.
#[cfg(unix)]
pub fn write_secret_file(path: &Path, contents: &[u8]) -> Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let io_err = |source| CertAideError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(io_err)?;
    // `mode` only applies on creation; tighten a pre-existing file too.
    file.set_permissions(Permissions::from_mode(0o600))
        .map_err(io_err)?;
    file.write_all(contents).map_err(io_err)?;

    Ok(())
}

#[cfg(not(unix))]
pub fn write_secret_file(path: &Path, contents: &[u8]) -> Result<()> {
    write_file(path, contents)
}

/// Writes PEM text produced elsewhere in the crate.
pub fn write_pem(path: &Path, pem: &str) -> Result<()> {
    write_file(path, pem.as_bytes())
}

/// Reads a certificate file in PEM or DER form.
pub fn read_certificate(path: &Path) -> Result<Certificate> {
    Certificate::parse(&read_file(path)?)
}

/// Saves `certificate` as a `CERTIFICATE` PEM block.
pub fn save_certificate(path: &Path, certificate: &Certificate) -> Result<()> {
    write_pem(path, &certificate.to_pem()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_overwrites_and_read_returns_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pem");

        write_file(&path, b"first version, longer").unwrap();
        write_file(&path, b"second").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"second");
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pem");
        match read_file(&path) {
            Err(CertAideError::Io { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.key");
        write_file(&path, b"old").unwrap();
        write_secret_file(&path, b"secret").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(read_file(&path).unwrap(), b"secret");
    }
}
