//! The built-in level catalog: tutorials first, then puzzles by difficulty.

use crate::level::{Level, LevelKind};

/// All built-in levels in catalog order.
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level::accept("How to Play", LevelKind::Tutorial, "01_")
            .examples(&["1", "0", "1100", "101", "111", "000", "1001", "0110"], &[""])
            .describe(
                "Learn the core mechanics of building a Turing Machine.",
                "Build a Turing machine that accepts any binary words that aren't empty.",
                "Accept all binary words except the empty word.",
            ),
        Level::transform("How to Play 2: Transformations", LevelKind::Tutorial, "01_")
            .tests(&[("101", ""), ("1", ""), ("0", ""), ("", "")])
            .describe(
                "Learn the core mechanics of building a Turing Machine that transforms input.",
                "Build a Turing machine that transforms all binary elements to blank. So for example 101 becomes ___",
                "Turn all 0s and 1s to _",
            ),
        Level::transform("How to Play 3: Double Tape", LevelKind::Tutorial, "01_")
            .tests(&[("101", "101"), ("1", "1"), ("0", "0"), ("", "")])
            .describe(
                "Learn the core mechanics of building a Two-Tape Turing Machine.",
                "Build a Two-Tape Turing machine that copies the input from the first tape to the second tape. So for example 101 becomes 101 on the second tape.",
                "Copy the input from the first tape to the second tape.",
            )
            .with_dual_tape(),
        Level::transform("Flip 0s and 1s", LevelKind::Starter, "01_")
            .tests(&[("1010", "0101"), ("111000", "000111"), ("000", "111"), ("1", "0"), ("", "")])
            .describe(
                "Flip all 0s to 1s and all 1s to 0s in a binary string.",
                "Turing machine transforms a binary string by flipping all '0's to '1's and all '1's to '0's. For example, it should transform '1010' to '0101', '111000' to '000111', and '000' to '111'. Can be achieved with using write.",
                "Flip every 0 to 1 and every 1 to 0.",
            ),
        Level::accept("Accept 101", LevelKind::Starter, "01_")
            .examples(&["101"], &["0", "1", "10", "11", "100", "110", "111", "000", "001", "010", "1011", "1010", "0101", "1010101"])
            .describe(
                "Build a Turing Machine that only accepts the string 101.",
                "Turing machine accepts string 101 while rejecting all others, for example: 0, 1, 10..etc",
                "Accept exactly the word 101 and reject all others.",
            ),
        Level::accept("No 001", LevelKind::Starter, "01_")
            .examples(&["110", "0", "1", "00", "01", "10", "11", "000", "010", "100", "101", "111"], &["001", "1001", "0001", "0010", "101001"])
            .describe(
                "Accept binary strings that do not contain the substring 001.",
                "Turing machine accepts any binary string that does not contain the substring '001'. For example, it should accept '0', '1', '00', '01', '10', '11', '000', '010', etc., but reject '001', '1001', '0001', etc.",
                "Reject any input containing '001'.",
            ),
        Level::accept("Count 1s", LevelKind::Starter, "01_")
            .examples(&["1011", "111", "000110001", "100000000101", "110001", "010101", "0111", "111000"], &["", "0", "1", "11", "1111", "000", "1000111", "0001", "1010", "1100", "0011", "0110"])
            .describe(
                "Accept strings with exactly three 1s.",
                "Turing machine accepts strings with exactly three 1s while rejecting all others. For example, it should accept '111', '1011', '000110001', etc., but reject '', '0', '1', '11', '1111', etc.",
                "Accept if there are exactly three '1's in the input.",
            ),
        Level::accept("Letters", LevelKind::Starter, "ABC_")
            .examples(&["AB", "ACB", "AAB", "CCCCABBBBBCCB", "AAACCCBBB"], &["BA", "BCA", "CBA", "BBB"])
            .describe(
                "Accept strings where ALL A's come before ALL B's. Like ACCB but not BACA.",
                "Turing machine accepts strings where 'A' appears before 'B', such as 'AB', 'ACB', 'AAB', etc., while rejecting strings where 'B' appears before 'A' or where 'A' is absent, such as 'BA', 'BCA', 'CBA', etc.",
                "Accept if 'A' appears before 'B' in the string.",
            ),
        Level::accept("Even 0s", LevelKind::Starter, "01_")
            .examples(&["1100", "1", "11", "111", "00", "11", "1010", "1100", "1001", "0110"], &["0", "10", "01", "000", "1110", "1101", "1010101", "00000"])
            .describe(
                "Accept binary strings with an even number of 0s.",
                "Turing machine accepts binary strings that contain an even number of '0's, such as '11', '00', '1100', '1010', etc., while rejecting strings with an odd number of '0's like '0', '10', '01', '000', etc.",
                "Accept if the count of '0's is even, reject otherwise.",
            ),
        Level::accept("Palindrome", LevelKind::Medium, "01_")
            .examples(&["0110", "", "0", "1", "00", "11", "101", "010", "111", "000", "1001"], &["01", "10", "001", "110", "100", "011", "1010", "1100"])
            .describe(
                "Accept binary palindromes.",
                "Turing machine accepts binary palindromes such as '', '0', '1', '00', '11', '101', '010', etc., while rejecting non-palindromic strings like '01', '10', '001', etc.",
                "Accept if the input reads the same forwards and backwards.",
            ),
        Level::transform("Binaries: Add 1", LevelKind::Medium, "01_")
            .tests(&[("101", "110"), ("111", "1000"), ("0", "1"), ("1101", "1110"), ("10011", "10100")])
            .describe(
                "Add 1 to a binary number.",
                "Turing machine adds 1 to a binary number represented as a string. For example, it should transform '101' to '110', '111' to '1000', and '0' to '1', Etc..",
                "Transform the binary number by adding 1.",
            ),
        Level::transform("Binaries: Subtract 1", LevelKind::Medium, "01_")
            .tests(&[("110", "101"), ("1000", "111"), ("1", ""), ("1110", "1101"), ("10100", "10011")])
            .describe(
                "Subtract 1 from a binary number.",
                "Turing machine subtracts 1 from a binary number represented as a string. For example, it should transform '110' to '101', '1000' to '111', and '1' to '', Etc..",
                "Transform the binary number by subtracting 1.",
            ),
        Level::accept("N repetitions", LevelKind::Medium, "01_")
            .examples(&["000111", "", "01", "0011", "00001111", "0000011111"], &["0", "1", "10", "11", "0001111", "00111", "001", "1100", "111000", "00011111"])
            .describe(
                "Accept strings of the form 0^n1^n (n 0s followed by n 1s).",
                "Turing machine accepts strings that consist of '0's followed by '1's, where the number of '0's is equal to the number of '1's. For example, it should accept '0011', '000111', and '', while rejecting strings like '0001111', '1100', '00011111', etc.",
                "Accept if the input is of the form 0^n1^n.",
            ),
        Level::accept("N repetitions and M repetitions", LevelKind::Medium, "01_")
            .examples(&["000111111", "", "011", "001111", "000111111", "000011111111", "000001111111111"], &["0", "1", "10", "11", "01", "0001111", "00111", "0011", "001", "1100", "111000", "00011111"])
            .describe(
                "Accept strings of the form 0^n1^m (n 0s followed by m 1s). where m = 2*n",
                "Turing machine accepts strings that consist of '0's followed by '1's, where the number of '1's is exactly two times the number of '0's. For example, it should accept '000111111', '011', and '', while rejecting strings like '00111', '1100', '00011111', etc.",
                "Accept if the input is of the form 0^n1^m where m = 2*n.",
            ),
        Level::accept("Pairs of 1s", LevelKind::Medium, "01_")
            .examples(&["0011", "00011011", "11", "1100", "00110011", "000000011"], &["1", "101", "111", "10", "01", "0001", "1000", "1110"])
            .describe(
                "Accept binary strings where all 1s appear in pairs.",
                "Turing machine accepts binary strings where every '1' appears in pairs, such as '0011', '00011011', '11', etc., while rejecting strings with unpaired '1's like '1', '101', '111', etc.",
                "Accept if all '1's appear in pairs.",
            ),
        Level::transform("Most Frequent Character", LevelKind::Hard, "01_")
            .tests(&[("1100", "0"), ("11100", "1"), ("1010101", "1"), ("1111", "1"), ("000", "0"), ("101010", "0")])
            .describe(
                "Given a binary word, output only the most used character, incase of a tie output 0.",
                "Turing machine reads a binary string and outputs the character ('0' or '1') that appears most frequently in the input. Incase of a tie, it should output '0'. For example, it should transform '1100' to '0', '1111000' to '1', and '10100' to '0'.",
                "Output the most frequent character, or '0' in case of a tie.",
            ),
        Level::transform("1s to binary", LevelKind::Hard, "10_#")
            .tests(&[("111", "11"), ("11111", "101"), ("1", "1"), ("1111111", "111"), ("11111111", "1000"), ("", "")])
            .describe(
                "Convert a unary number (a series of 1s) to its binary representation.",
                "Turing machine converts a unary number, represented as a series of '1's, into its binary representation. For example, it should transform '111' to '11' (which is 3 in binary), '11111' to '101' (which is 5 in binary), and '1' to '1' (which is 1 in binary).",
                "Convert unary '1's to their binary representation.",
            ),
        Level::transform("Two Tapes: Longest Run", LevelKind::Hard, "01_")
            .tests(&[("1100011110", "1111"), ("0001111000", "1111"), ("101010", "1"), ("111100001111", "1111"), ("000000111", "000000")])
            .describe(
                "Find the longest run of consecutive 1s or 0s in a binary string.",
                "Turing machine finds the longest consecutive sequence (run) of either '0's or '1's in a binary string and outputs that sequence. For example, it should transform '1100011110' to '1111', '0001111000' to '0000', and '101010' to '1'. Incase of a tie pick the 1s for example: '1100' output '11'.",
                "Output the longest run of consecutive '0's or '1's.",
            )
            .with_dual_tape(),
        Level::transform("Two Tapes: Add binaries", LevelKind::Hard, "01_#")
            .tests(&[("1101#101", "10010"), ("1000#1", "1001"), ("1010#10", "1100"), ("1111#111", "11110"), ("10000#1", "10001")])
            .describe(
                "Add two binary numbers separated by a # symbol.",
                "Turing machine adds two binary numbers, where the two numbers are separated by a '#' symbol. For example, it should transform '1101#101' to '10010' (which is 13 + 5 = 18 in binary), '1000#1' to '1001' (which is 8 + 1 = 9 in binary), and '1010#10' to '1100' (which is 10 + 2 = 12 in binary).",
                "Add the two binary numbers. The result must be on the bottom tape.",
            )
            .with_dual_tape(),
        Level::transform("Two Tapes: Subtract binaries", LevelKind::Hard, "01_#")
            .tests(&[("1101#101", "1000"), ("1000#1", "111"), ("1010#10", "1000"), ("1111#111", "1000"), ("10000#1", "1111")])
            .describe(
                "Subtract two binary numbers separated by a # symbol.",
                "Turing machine subtracts the second binary number from the first binary number, where the two numbers are separated by a '#' symbol. For example, it should transform '1101#101' to '1000' (which is 13 - 5 = 8 in binary), '1000#1' to '111' (which is 8 - 1 = 7 in binary), and '1010#10' to '1000' (which is 10 - 2 = 8 in binary). Consider only non-negative results.",
                "Subtract the second binary number from the first. The result must be on the bottom tape.",
            )
            .with_dual_tape(),
        Level::transform("Two Tapes: Sorting", LevelKind::Hard, "12345_")
            .tests(&[("321", "123"), ("54321", "12345"), ("2143", "1234"), ("5", "5"), ("111221", "111122")])
            .describe(
                "Sort a word of 1 to 5 from least to greatetest, left to right.",
                "Turing machine sorts a string of digits (from '1' to '5') in ascending order from left to right. For example, it should transform '321' to '123', '54321' to '12345', and '2143' to '1234' Incase of a tie keep both together for example '1122'.",
                "Sort the input string in ascending order.",
            )
            .with_dual_tape(),
    ]
}
