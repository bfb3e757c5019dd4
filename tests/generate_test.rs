use asset_gen::{
    generate, generate_with, AssetError, GenerationRequest, ImageTranscoder, OutputFormat,
    Platform, QualityTier, SourceImage, Transcoder,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::cell::Cell;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

/// Creates a size×size RGBA gradient and returns it PNG-encoded
fn gradient_png(size: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(size, size, |x, y| {
        let red = (255.0 * x as f32 / size as f32) as u8;
        let green = (255.0 * y as f32 / size as f32) as u8;
        Rgba([red, green, 128, 255])
    });

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode source image");
    buf.into_inner()
}

fn assert_png_size(path: &Path, expected: u32) {
    assert!(path.exists(), "missing output: {}", path.display());
    let (w, h) = image::image_dimensions(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    assert_eq!(
        (w, h),
        (expected, expected),
        "unexpected size for {}",
        path.display()
    );
}

/// Fails the n-th transcode call (1-based) and delegates every other call.
struct FailOnCall {
    fail_on: usize,
    calls: Cell<usize>,
    inner: ImageTranscoder,
}

impl FailOnCall {
    fn new(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: Cell::new(0),
            inner: ImageTranscoder::new(),
        }
    }
}

impl Transcoder for FailOnCall {
    fn transcode(
        &self,
        source: &[u8],
        format: OutputFormat,
        width: u32,
        height: u32,
    ) -> asset_gen::Result<Vec<u8>> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(AssetError::encode("injected fault"));
        }
        self.inner.transcode(source, format, width, height)
    }
}

#[test]
fn test_logo_android_and_ios() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let root = temp.path();
    let source = SourceImage::from_bytes(gradient_png(512)).unwrap();

    let request = GenerationRequest::new("logo", [Platform::Android, Platform::Ios], &source);
    let result = generate(root, &request).expect("generation should run");

    assert!(result.is_success(), "{result:#?}");
    assert_eq!(result.base_name, "logo");
    assert_png_size(&root.join("logo.png"), 512);

    for (bucket, size) in [
        ("ldpi", 96),
        ("mdpi", 128),
        ("hdpi", 192),
        ("xhdpi", 256),
        ("xxhdpi", 384),
        ("xxxhdpi", 512),
    ] {
        assert_png_size(&root.join("Android").join(bucket).join("logo.png"), size);
    }

    assert_png_size(&root.join("IOS").join("logo.png"), 128);
    assert_png_size(&root.join("IOS").join("logo@2.png"), 256);
    assert_png_size(&root.join("IOS").join("logo@3.png"), 384);

    assert!(!root.join("Windows").exists(), "Windows was not requested");
    assert!(result.platform(Platform::Windows).is_none());
}

#[test]
fn test_main_copy_is_the_source_verbatim() {
    let temp = TempDir::new().unwrap();
    let bytes = gradient_png(64);
    let source = SourceImage::from_bytes(bytes.clone()).unwrap();

    let request = GenerationRequest::new("icon", [Platform::Ios], &source);
    let result = generate(temp.path(), &request).unwrap();

    assert_eq!(result.main.path, temp.path().join("icon.png"));
    assert_eq!(std::fs::read(&result.main.path).unwrap(), bytes);
}

#[test]
fn test_jpeg_source_main_copy_is_png() {
    let temp = TempDir::new().unwrap();
    let mut jpeg = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 40, Rgba([200, 10, 10, 255])))
        .to_rgb8()
        .write_to(&mut jpeg, ImageFormat::Jpeg)
        .unwrap();
    let source = SourceImage::from_bytes(jpeg.into_inner()).unwrap();

    let request = GenerationRequest::new("photo", [Platform::Windows], &source);
    let result = generate(temp.path(), &request).unwrap();
    assert!(result.is_success(), "{result:#?}");

    let main = std::fs::read(temp.path().join("photo.png")).unwrap();
    assert_eq!(image::guess_format(&main).unwrap(), ImageFormat::Png);
    assert_png_size(&temp.path().join("photo.png"), 40);
}

#[test]
fn test_windows_scale_assets() {
    let temp = TempDir::new().unwrap();
    let source = SourceImage::from_bytes(gradient_png(400)).unwrap();

    let request = GenerationRequest::new("tile", [Platform::Windows], &source);
    let result = generate(temp.path(), &request).unwrap();
    assert!(result.is_success(), "{result:#?}");

    let windows = temp.path().join("Windows");
    assert_png_size(&windows.join("tile.scale-100.png"), 100);
    assert_png_size(&windows.join("tile.scale-140.png"), 140);
    assert_png_size(&windows.join("tile.scale-180.png"), 180);
    assert_png_size(&windows.join("tile.scale-240.png"), 240);

    let ids: Vec<&str> = result
        .variants()
        .map(|(platform, v)| {
            assert_eq!(platform, Platform::Windows);
            v.id
        })
        .collect();
    assert_eq!(ids, ["scale-100", "scale-140", "scale-180", "scale-240"]);
}

#[test]
fn test_second_run_gets_fresh_platform_folders() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let source = SourceImage::from_bytes(gradient_png(64)).unwrap();
    let request = GenerationRequest::new("logo", [Platform::Android, Platform::Ios], &source);

    let first = generate(root, &request).unwrap();
    let second = generate(root, &request).unwrap();
    assert!(first.is_success() && second.is_success());

    let folder = |r: &asset_gen::GenerationResult, p| {
        r.platform(p).unwrap().folder.as_ref().unwrap().clone()
    };
    assert_eq!(folder(&first, Platform::Android), root.join("Android"));
    assert_eq!(folder(&second, Platform::Android), root.join("Android (2)"));
    assert_eq!(folder(&second, Platform::Ios), root.join("IOS (2)"));

    // the first run's files are untouched, the main copy is refreshed in place
    assert_png_size(&root.join("Android").join("mdpi").join("logo.png"), 16);
    assert_png_size(&root.join("Android (2)").join("mdpi").join("logo.png"), 16);
    assert_png_size(&root.join("IOS (2)").join("logo@3.png"), 48);
    assert_png_size(&root.join("logo.png"), 64);
}

#[test]
fn test_blank_name_is_replaced_with_identifier() {
    let temp = TempDir::new().unwrap();
    let source = SourceImage::from_bytes(gradient_png(32)).unwrap();

    let request = GenerationRequest::new("   ", [Platform::Ios], &source);
    let result = generate(temp.path(), &request).unwrap();

    assert!(!result.base_name.trim().is_empty());
    assert!(!temp.path().join(".png").exists());
    assert!(temp
        .path()
        .join(format!("{}.png", result.base_name))
        .exists());
    assert!(temp
        .path()
        .join("IOS")
        .join(format!("{}@2.png", result.base_name))
        .exists());
}

#[test]
fn test_xhdpi_failure_does_not_abort_the_run() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let source = SourceImage::from_bytes(gradient_png(512)).unwrap();
    // PNG main copy is written verbatim, so XHDPI is the fourth transcode
    let transcoder = FailOnCall::new(4);

    let request = GenerationRequest::new("logo", [Platform::Android, Platform::Ios], &source);
    let result = generate_with(&transcoder, root, &request).unwrap();

    let android = result.platform(Platform::Android).unwrap();
    for id in ["LDPI", "MDPI", "HDPI", "XXHDPI", "XXXHDPI"] {
        assert!(android.variant(id).unwrap().is_success(), "{id} should succeed");
    }
    let xhdpi = android.variant("XHDPI").unwrap();
    assert!(matches!(xhdpi.error(), Some(AssetError::EncodeFailure(_))));
    assert_eq!((xhdpi.width, xhdpi.height), (256, 256));
    assert!(!root.join("Android").join("xhdpi").join("logo.png").exists());

    let ios = result.platform(Platform::Ios).unwrap();
    assert!(ios.is_success());
    assert_png_size(&root.join("IOS").join("logo@2.png"), 256);

    assert!(!result.is_success());
    assert_eq!(result.failure_count(), 1);
}

/// Replaces the output root with a plain file on the n-th transcode call.
struct ClobberRootOnCall<'a> {
    root: &'a Path,
    on_call: usize,
    calls: Cell<usize>,
    inner: ImageTranscoder,
}

impl Transcoder for ClobberRootOnCall<'_> {
    fn transcode(
        &self,
        source: &[u8],
        format: OutputFormat,
        width: u32,
        height: u32,
    ) -> asset_gen::Result<Vec<u8>> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.on_call {
            std::fs::remove_dir_all(self.root).unwrap();
            std::fs::write(self.root, b"").unwrap();
        }
        self.inner.transcode(source, format, width, height)
    }
}

#[test]
fn test_platform_folder_failure_is_recorded_not_raised() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");
    let source = SourceImage::from_bytes(gradient_png(64)).unwrap();
    // XXXHDPI is the sixth transcode; afterwards no folder can be created under root
    let transcoder = ClobberRootOnCall {
        root: &root,
        on_call: 6,
        calls: Cell::new(0),
        inner: ImageTranscoder::new(),
    };

    let request = GenerationRequest::new("logo", [Platform::Android, Platform::Ios], &source);
    let result = generate_with(&transcoder, &root, &request).expect("run should complete");

    let android = result.platform(Platform::Android).unwrap();
    assert!(android.folder.is_ok());
    assert_eq!(android.variants.len(), 6);
    for id in ["LDPI", "MDPI", "HDPI", "XHDPI", "XXHDPI"] {
        assert!(android.variant(id).unwrap().is_success(), "{id} should succeed");
    }
    assert!(matches!(
        android.variant("XXXHDPI").unwrap().error(),
        Some(AssetError::Filesystem { .. })
    ));

    let ios = result.platform(Platform::Ios).unwrap();
    assert!(matches!(ios.folder, Err(AssetError::Filesystem { .. })));
    assert!(ios.variants.is_empty());
    assert_eq!(result.failure_count(), 2);
}

#[test]
fn test_variant_write_failure_is_recorded_per_variant() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let source = SourceImage::from_bytes(gradient_png(64)).unwrap();

    // a directory sitting where the @1x file goes cannot be overwritten by a file
    struct BlockFirstIosFile<'a>(&'a Path, ImageTranscoder);
    impl Transcoder for BlockFirstIosFile<'_> {
        fn transcode(
            &self,
            source: &[u8],
            format: OutputFormat,
            width: u32,
            height: u32,
        ) -> asset_gen::Result<Vec<u8>> {
            let blocker = self.0.join("IOS").join("logo.png");
            if width == 16 && !blocker.exists() {
                std::fs::create_dir_all(&blocker).unwrap();
            }
            self.1.transcode(source, format, width, height)
        }
    }

    let transcoder = BlockFirstIosFile(root, ImageTranscoder::new());
    let request = GenerationRequest::new("logo", [Platform::Ios], &source);
    let result = generate_with(&transcoder, root, &request).unwrap();

    let ios = result.platform(Platform::Ios).unwrap();
    assert!(matches!(
        ios.variant("@1x").unwrap().error(),
        Some(AssetError::Filesystem { .. })
    ));
    assert!(ios.variant("@2x").unwrap().is_success());
    assert!(ios.variant("@3x").unwrap().is_success());
    assert_eq!(result.failure_count(), 1);
}

#[test]
fn test_preview_lookup_on_result() {
    let temp = TempDir::new().unwrap();
    let source = SourceImage::from_bytes(gradient_png(128)).unwrap();

    let request = GenerationRequest::new("logo", Platform::ALL, &source);
    let result = generate(temp.path(), &request).unwrap();

    let medium = result.preview(Platform::Android, QualityTier::Medium).unwrap();
    assert_eq!(medium.id, "XHDPI");
    assert_eq!((medium.width, medium.height), (64, 64));

    let high = result.preview(Platform::Windows, QualityTier::High).unwrap();
    assert_eq!(high.id, "scale-240");

    let text = asset_gen::preview::describe(result.preview(Platform::Ios, QualityTier::Low));
    assert!(text.starts_with("Name: logo.png\nImageSize: 32x32\nFileSize: "), "{text}");
}

#[test]
fn test_undecodable_source_fails_before_any_io() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");
    let source = SourceImage::new(b"not an image at all".to_vec(), 64, 64);

    let request = GenerationRequest::new("logo", [Platform::Android], &source);
    let err = generate(&root, &request).unwrap_err();

    assert!(matches!(err, AssetError::InvalidSourceImage(_)), "{err}");
    assert!(!root.exists());
}

#[test]
fn test_corrupt_png_fails_before_any_io() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");

    // header and IHDR stay intact, pixel data is cut short and scrambled
    let mut bytes = gradient_png(64);
    bytes.truncate(bytes.len() / 2);
    for b in bytes.iter_mut().skip(60) {
        *b ^= 0xa5;
    }
    let source = SourceImage::new(bytes, 64, 64);

    let request = GenerationRequest::new("logo", [Platform::Ios], &source);
    let err = generate(&root, &request).unwrap_err();

    assert!(matches!(err, AssetError::InvalidSourceImage(_)), "{err}");
    assert!(!root.exists(), "nothing should be written for a corrupt source");
}
