use serde::Serialize;

/// A song that ships with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Song {
    pub title: &'static str,
    pub artist: &'static str,
    /// Suggested voice, in the descriptive vocabulary.
    pub voice: &'static str,
    pub lyrics: &'static str,
}

pub const PRELOADED_SONGS: &[Song] = &[
    Song {
        title: "Twinkle, Twinkle, Little Star",
        artist: "Jane Taylor",
        voice: "Childlike",
        lyrics: "Twinkle, twinkle, little star,
How I wonder what you are!
Up above the world so high,
Like a diamond in the sky.

When the blazing sun is gone,
When he nothing shines upon,
Then you show your little light,
Twinkle, twinkle, all the night.

Then the trav'ller in the dark,
Thanks you for your tiny spark,
He could not see which way to go,
If you did not twinkle so.",
    },
    Song {
        title: "Amazing Grace",
        artist: "John Newton",
        voice: "FemaleAlto",
        lyrics: "Amazing grace! How sweet the sound
That saved a wretch like me!
I once was lost, but now am found;
Was blind, but now I see.

'Twas grace that taught my heart to fear,
And grace my fears relieved;
How precious did that grace appear
The hour I first believed.

Through many dangers, toils, and snares,
I have already come;
'Tis grace hath brought me safe thus far,
And grace will lead me home.",
    },
    Song {
        title: "Row, Row, Row Your Boat",
        artist: "Traditional",
        voice: "MaleTenor",
        lyrics: "Row, row, row your boat,
Gently down the stream.
Merrily, merrily, merrily, merrily,
Life is but a dream.",
    },
];

pub fn find_song(title: &str) -> Option<&'static Song> {
    PRELOADED_SONGS.iter().find(|s| s.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::line_count;
    use crate::voice::VoiceStyle;

    #[test]
    fn every_song_has_a_known_voice_and_lines() {
        for song in PRELOADED_SONGS {
            assert!(song.voice.parse::<VoiceStyle>().is_ok(), "{}", song.title);
            assert!(line_count(song.lyrics) > 0);
        }
    }

    #[test]
    fn lookup_by_title() {
        assert_eq!(find_song("Amazing Grace").map(|s| s.artist), Some("John Newton"));
        assert!(find_song("None").is_none());
        assert_eq!(line_count(find_song("Row, Row, Row Your Boat").unwrap().lyrics), 4);
    }
}
