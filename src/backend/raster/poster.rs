use crate::backend::raster::RasterImage;
use crate::error::{Error, Result};
use crate::poster::{PosterCompletion, PosterLoader};

/// Fetches and decodes posters on a background thread.
///
/// Accepts `http://` and `https://` URLs, `file://` URLs and plain paths.
/// Other schemes fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterPosterLoader;

impl RasterPosterLoader {
    fn fetch(reference: &str) -> Result<RasterImage> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            let bytes = reqwest::blocking::get(reference)?
                .error_for_status()?
                .bytes()?;
            return RasterImage::decode(&bytes);
        }

        match reference.strip_prefix("file://") {
            Some(path) => RasterImage::open(path),
            None if reference.contains("://") => Err(Error::PosterLoad {
                reference: reference.to_owned(),
                reason: "unsupported scheme".into(),
            }),
            None => RasterImage::open(reference),
        }
    }
}

impl PosterLoader for RasterPosterLoader {
    type Image = RasterImage;

    fn load(&self, reference: &str, completion: PosterCompletion<RasterImage>) {
        let reference = reference.to_owned();
        let spawned = std::thread::Builder::new()
            .name("poster-loader".into())
            .spawn(move || {
                let result = Self::fetch(&reference);
                if let Err(err) = &result {
                    tracing::debug!(%reference, %err, "poster fetch failed");
                }
                completion.resolve(result);
            });

        // The unresolved completion is dropped with the closure, which the buffer sees as a failure.
        if let Err(err) = spawned {
            tracing::warn!(%err, "failed to spawn poster loader");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    use super::*;
    use crate::poster::PendingPoster;
    use crate::surface::Image;
    use crate::types::Size;

    fn wait<I>(mut pending: PendingPoster<I>) -> Result<I> {
        for _ in 0..500 {
            if let Some(result) = pending.try_take() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("poster load never completed");
    }

    fn load(reference: &str) -> Result<RasterImage> {
        let (completion, pending) = PosterCompletion::channel(reference);
        RasterPosterLoader.load(reference, completion);
        wait(pending)
    }

    fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut bytes = Vec::new();
        RasterImage::solid(width, height, rgba)
            .as_rgba()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Answer a single HTTP request on localhost, returning the URL to fetch.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let header = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });

        format!("http://{addr}/poster.png")
    }

    #[test]
    fn loads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        std::fs::write(&path, png(3, 2, [0, 128, 255, 255])).unwrap();

        let image = load(&format!("file://{}", path.display())).unwrap();
        assert_eq!(image.size(), Size::new(3, 2));
        assert_eq!(image.pixels()[..4], [0, 128, 255, 255]);

        let image = load(&path.display().to_string()).unwrap();
        assert_eq!(image.size(), Size::new(3, 2));
    }

    #[test]
    fn loads_png_over_http() {
        let url = serve_once("200 OK", png(4, 4, [10, 20, 30, 255]));
        let image = load(&url).unwrap();
        assert_eq!(image.size(), Size::new(4, 4));
        assert_eq!(image.pixels()[..4], [10, 20, 30, 255]);
    }

    #[test]
    fn http_error_status_fails() {
        let url = serve_once("404 Not Found", Vec::new());
        assert!(matches!(load(&url), Err(Error::Http(_))));
    }

    #[test]
    fn missing_file_fails() {
        assert!(matches!(load("/definitely/not/here.png"), Err(Error::Io(_))));
    }

    #[test]
    fn unknown_schemes_fail() {
        assert!(matches!(
            load("ftp://example.com/p.png"),
            Err(Error::PosterLoad { .. })
        ));
    }
}
