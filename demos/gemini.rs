use std::path::PathBuf;
use std::time::Instant;

use melodia_lingua::{
    engines::gemini::GeminiEngine,
    songs::find_song,
    synthesis::{synthesize_song, translate_lyrics, SongRequestBuilder},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut engine = GeminiEngine::from_env()?;
    let song = find_song("Twinkle, Twinkle, Little Star").ok_or("song missing")?;

    let translate_start = Instant::now();
    let malayalam = translate_lyrics(&mut engine, song.lyrics)?;
    println!("Translated in {:.2?}:\n{malayalam}\n", translate_start.elapsed());

    let request = SongRequestBuilder::default()
        .lyrics(malayalam)
        .voice(song.voice)
        .make_duet(std::env::args().any(|a| a == "--duet"))
        .build()?;

    let synth_start = Instant::now();
    let result = synthesize_song(&mut engine, &request)?;
    let synth_dur = synth_start.elapsed();
    println!(
        "Synthesized {:.2}s audio in {:.2?}",
        result.duration_secs(),
        synth_dur
    );

    result.write_wav(&PathBuf::from("melodia-lingua-song.wav"))?;
    println!("Saved to melodia-lingua-song.wav");
    Ok(())
}
