use std::path::Path;

/// Write a rendered image to `path` in one call, replacing any existing file.
pub fn write_bytes(bytes: &[u8], path: &Path) -> crate::Result<()> {
    std::fs::write(path, bytes)
        .map_err(|source| crate::RenderError::Write { path: path.to_path_buf(), source })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "image written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_path_is_write_error() {
        let path = std::env::temp_dir().join("hexplot_no_such_dir").join("nested").join("out.svg");
        let err = write_bytes(b"<svg/>", &path).unwrap_err();
        assert!(matches!(err, crate::RenderError::Write { .. }), "{err}");
        assert!(!path.exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let path = std::env::temp_dir().join(format!("hexplot_svg_{}.svg", std::process::id()));
        write_bytes(b"first", &path).unwrap();
        write_bytes(b"second", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        std::fs::remove_file(&path).ok();
    }
}
