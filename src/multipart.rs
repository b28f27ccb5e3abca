use std::io::{self, Read};

const BOUNDARY_BYTES: usize = 30;

/// File part for [`with_multipart`](crate::with_multipart).
///
/// The reader is drained once, when the option is constructed.
pub struct UploadFile {
    /// Form field name of the part.
    pub field: String,
    /// File name reported in `Content-Disposition`.
    pub file_name: String,
    /// File contents.
    pub reader: Box<dyn Read + Send>,
}

impl UploadFile {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        reader: impl Read + Send + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            reader: Box::new(reader),
        }
    }

    /// Creates a file part from in-memory contents.
    pub fn from_bytes(
        field: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(field, file_name, io::Cursor::new(contents.into()))
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Buffers a `multipart/form-data` body in memory.
pub(crate) struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
    has_parts: bool,
}

impl MultipartWriter {
    pub(crate) fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    pub(crate) fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
            has_parts: false,
        }
    }

    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Writes a file part. On a read error the bytes copied so far stay in
    /// the part and the writer remains usable.
    pub(crate) fn write_file(
        &mut self,
        field: &str,
        file_name: &str,
        reader: &mut dyn Read,
    ) -> io::Result<u64> {
        self.begin_part(field, Some(file_name));
        io::copy(reader, &mut self.buf)
    }

    pub(crate) fn write_field(&mut self, name: &str, value: &str) {
        self.begin_part(name, None);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.has_parts {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"--\r\n");
        self.buf
    }

    fn begin_part(&mut self, name: &str, file_name: Option<&str>) {
        if self.has_parts {
            self.buf.extend_from_slice(b"\r\n");
        }
        self.has_parts = true;

        self.buf.extend_from_slice(b"--");
        self.buf.extend_from_slice(self.boundary.as_bytes());
        self.buf.extend_from_slice(b"\r\nContent-Disposition: form-data; name=\"");
        self.buf.extend_from_slice(escape_quotes(name).as_bytes());
        self.buf.extend_from_slice(b"\"");
        if let Some(file_name) = file_name {
            self.buf.extend_from_slice(b"; filename=\"");
            self.buf.extend_from_slice(escape_quotes(file_name).as_bytes());
            self.buf.extend_from_slice(b"\"\r\nContent-Type: application/octet-stream");
        }
        self.buf.extend_from_slice(b"\r\n\r\n");
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn random_boundary() -> String {
    let bytes: [u8; BOUNDARY_BYTES] = rand::random();
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::{random_boundary, MultipartWriter, UploadFile};

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "disk gone"));
            }
            self.served = true;
            let n = buf.len().min(3);
            buf[..n].copy_from_slice(&b"abc"[..n]);
            Ok(n)
        }
    }

    #[test]
    fn boundary_is_sixty_hex_chars() {
        let boundary = random_boundary();
        assert_eq!(boundary.len(), 60);
        assert!(boundary.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(boundary, random_boundary());
    }

    #[test]
    fn writes_file_then_fields() {
        let mut writer = MultipartWriter::with_boundary("XYZ");
        let mut file = UploadFile::from_bytes("upload", "a.txt", "hello");
        writer
            .write_file(&file.field, &file.file_name, &mut file.reader)
            .expect("in-memory copy must succeed");
        writer.write_field("name", "kit");

        assert_eq!(writer.content_type(), "multipart/form-data; boundary=XYZ");
        let body = String::from_utf8(writer.finish()).expect("body is utf-8");
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             hello\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             kit\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn empty_form_is_only_the_closing_boundary() {
        let body = MultipartWriter::with_boundary("XYZ").finish();
        assert_eq!(body, b"--XYZ--\r\n");
    }

    #[test]
    fn escapes_quotes_in_names() {
        let mut writer = MultipartWriter::with_boundary("B");
        writer.write_field("say \"hi\"", "v");
        let body = String::from_utf8(writer.finish()).expect("body is utf-8");
        assert!(body.contains("name=\"say \\\"hi\\\"\""));
    }

    #[test]
    fn read_error_keeps_partial_part() {
        let mut writer = MultipartWriter::with_boundary("B");
        let err = writer
            .write_file("f", "x.bin", &mut FailingReader { served: false })
            .expect_err("reader fails on second read");
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);

        writer.write_field("after", "1");
        let body = String::from_utf8(writer.finish()).expect("body is utf-8");
        assert!(body.contains("\r\n\r\nabc\r\n--B\r\n"));
        assert!(body.ends_with("name=\"after\"\r\n\r\n1\r\n--B--\r\n"));
    }
}
