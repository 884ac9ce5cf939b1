//! First-run reference data
//!
//! The surname encyclopedia, classic commanderies and one fully recorded
//! example family (李氏陇西堂). `default_registry` opens a book for each of
//! the ten leading surnames.

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;

use crate::components::*;
use crate::registry::{Registry, FOUNDER_GENERATION_NAME};

/// Families opened on first run, one per leading surname.
const SEEDED_FAMILIES: usize = 10;

const GENERIC_MOTTO: &str = "遵纪守法，尊祖敬宗，勤俭持家，和睦乡邻。";
const GENERIC_POEM: &str = "福禄寿喜，世代荣昌，祖德流芳，万古长青。";

fn hall(name: &str, description: &str, region: &str) -> Hall {
    Hall {
        name: name.to_string(),
        description: description.to_string(),
        region: Some(region.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn detailed(
    character: &str,
    pinyin: &str,
    origin: &str,
    totem: &str,
    famous: &[&str],
    distribution: &str,
    rank: u32,
    halls: Vec<Hall>,
) -> SurnameData {
    SurnameData {
        character: character.to_string(),
        pinyin: pinyin.to_string(),
        origin: origin.to_string(),
        totem_description: Some(totem.to_string()),
        halls,
        famous_ancestors: famous.iter().map(|s| s.to_string()).collect(),
        distribution: distribution.to_string(),
        population_rank: Some(rank),
    }
}

/// Remaining surnames of the top hundred, character and pinyin only.
const COMMON_SURNAMES: &[(&str, &str)] = &[
    ("杨", "Yáng"), ("黄", "Huáng"), ("赵", "Zhào"), ("周", "Zhōu"), ("吴", "Wú"),
    ("徐", "Xú"), ("孙", "Sūn"), ("马", "Mǎ"), ("朱", "Zhū"), ("胡", "Hú"),
    ("郭", "Guō"), ("何", "Hé"), ("林", "Lín"), ("高", "Gāo"), ("罗", "Luó"),
    ("郑", "Zhèng"), ("梁", "Liáng"), ("谢", "Xiè"), ("宋", "Sòng"), ("唐", "Táng"),
    ("许", "Xǔ"), ("邓", "Dèng"), ("韩", "Hán"), ("冯", "Féng"), ("曹", "Cáo"),
    ("彭", "Péng"), ("曾", "Zēng"), ("萧", "Xiāo"), ("田", "Tián"), ("董", "Dǒng"),
    ("潘", "Pān"), ("袁", "Yuán"), ("蔡", "Cài"), ("蒋", "Jiǎng"), ("余", "Yú"),
    ("于", "Yú"), ("杜", "Dù"), ("叶", "Yè"), ("程", "Chéng"), ("魏", "Wèi"),
    ("苏", "Sū"), ("吕", "Lǚ"), ("丁", "Dīng"), ("任", "Rèn"), ("卢", "Lú"),
    ("姚", "Yáo"), ("沈", "Shěn"), ("钟", "Zhōng"), ("姜", "Jiāng"), ("崔", "Cuī"),
    ("谭", "Tán"), ("陆", "Lù"), ("范", "Fàn"), ("汪", "Wāng"), ("廖", "Liào"),
    ("石", "Shí"), ("金", "Jīn"), ("韦", "Wéi"), ("贾", "Jiǎ"), ("夏", "Xià"),
    ("傅", "Fù"), ("方", "Fāng"), ("白", "Bái"), ("邹", "Zōu"), ("孟", "Mèng"),
    ("熊", "Xióng"), ("秦", "Qín"), ("邱", "Qiū"), ("江", "Jiāng"), ("尹", "Yǐn"),
    ("薛", "Xuē"), ("阎", "Yán"), ("段", "Duàn"), ("雷", "Léi"), ("侯", "Hóu"),
    ("龙", "Lóng"), ("史", "Shǐ"), ("陶", "Táo"), ("黎", "Lí"), ("贺", "Hè"),
    ("顾", "Gù"), ("毛", "Máo"), ("郝", "Hǎo"), ("龚", "Gōng"), ("邵", "Shào"),
    ("万", "Wàn"), ("钱", "Qián"), ("严", "Yán"), ("赖", "Lài"), ("覃", "Tán"),
    ("洪", "Hóng"), ("武", "Wǔ"), ("莫", "Mò"), ("孔", "Kǒng"),
];

pub static SURNAMES: Lazy<Vec<SurnameData>> = Lazy::new(|| {
    let mut list = vec![
        detailed(
            "李", "Lǐ",
            "李氏源出赢姓。颛顼帝高阳氏之后裔皋陶为尧大理（掌管刑法之官），子伯益为舜虞官（掌管山泽），其子孙历三代世袭大理之职，遂以官为氏，称理氏。商末，理利贞避难于伊侯之墟，食木子得活，遂改理为李。",
            "李姓图腾由虎、木、子三部分组成。虎代表皋陶祖先的图腾，木和子代表始祖李利贞食木子避难图腾。",
            &["李耳(老子)", "李世民", "李白", "李清照"],
            "李姓是当今中国第一大姓，分布极广。主要集中于河南、山东、四川、河北四省，约占全国李姓总人口的44%。",
            1,
            vec![
                hall("陇西堂", "李氏最为著名的堂号，源自秦汉时期的陇西郡。", "甘肃"),
                hall("赵郡堂", "源自战国赵国，李牧之后。", "河北"),
                hall("青莲堂", "源自唐代大诗人李白，号青莲居士。", "四川"),
            ],
        ),
        detailed(
            "王", "Wáng",
            "王氏主要源出有三：子姓、姬姓和妫姓。子姓王氏产生最早，始祖为比干；姬姓王氏源于周朝王室；妫姓王氏源于陈国。",
            "王姓图腾是酋长戴王冠的象形。象征至高无上的权力。",
            &["王翦", "王羲之", "王阳明", "王安石"],
            "王姓分布以北方为主，河南、山东、河北三省为王姓人口最稠密地区。",
            2,
            vec![
                hall("太原堂", "源自东汉王允，为王氏最显赫的一支。", "山西"),
                hall("琅琊堂", "源自秦朝王翦，后代在琅琊发展成为望族。", "山东"),
                hall("三槐堂", "北宋王祐手植三槐于庭，言子孙必有为三公者。", "河南"),
            ],
        ),
        detailed(
            "张", "Zhāng",
            "张氏源于黄帝赐姓。黄帝第五子挥，发明了弓箭，助黄帝平定天下，被赐姓张，封于青阳。",
            "张姓图腾由弓和长组成，意为手持弓箭的人，象征善于制造和使用弓箭。",
            &["张良", "张飞", "张居正", "张衡"],
            "张姓在全国分布广泛，主要集中于河南、山东、河北三省。",
            3,
            vec![
                hall("清河堂", "张姓的主要发源地之一。", "河北"),
                hall("百忍堂", "唐代张公艺九世同居，唐高宗问其道，公艺书百个'忍'字。", "山东"),
                hall("金鉴堂", "唐丞相张九龄千秋金鉴。", "广东"),
            ],
        ),
        detailed(
            "刘", "Liú",
            "刘氏源于祁姓，帝尧之后。尧第九子源明受封于刘（今河北大名），子孙以国为氏。",
            "刘姓图腾一位长者手持刻刀，契刻春天和秋天天气到达地球的运作规律。",
            &["刘邦", "刘彻", "刘备", "刘禹锡"],
            "刘姓主要分布于四川、河南、江西、山东、河北等地。",
            4,
            vec![
                hall("彭城堂", "刘氏总堂号，源自汉高祖刘邦老家。", "江苏"),
                hall("汉里堂", "纪念大汉皇族。", "江苏"),
                hall("藜照堂", "源自刘向燃藜夜读的典故。", "不详"),
            ],
        ),
        detailed(
            "陈", "Chén",
            "陈氏源于妫姓，舜帝之后。周武王封舜后裔胡公满于陈，子孙以国为氏。",
            "陈姓图腾是旌旗的象形，代表陈国。",
            &["陈胜", "陈平", "陈霸先", "陈独秀"],
            "陈姓在南方地区分布极广，尤其是福建、广东、浙江三省。",
            5,
            vec![
                hall("颖川堂", "陈氏最著名的郡望。", "河南"),
                hall("德星堂", "源自东汉陈寔，名德甚高，太史奏德星见五百里。", "河南"),
            ],
        ),
        detailed(
            "姜", "Jiāng",
            "姜姓源出神农氏，炎帝生于姜水，因以水名为姓。姜子牙周初受封于齐，是姜氏最显赫的始祖。",
            "姜姓图腾是羊和女的组合，代表母系社会中以羊为图腾的氏族。",
            &["姜子牙", "姜维", "姜夔"],
            "姜姓在北方分布较广，尤以山东为盛。",
            60,
            vec![
                hall("天水堂", "姜维后代发展而成。", "甘肃"),
                hall("稼墙堂", "纪念神农氏教民稼墙。", "各地"),
            ],
        ),
        detailed(
            "章", "Zhāng",
            "章氏主要源自姜姓和任姓。齐太公姜尚之后，封于章，以国为氏。又说源于任姓，黄帝赐封。",
            "章姓图腾是音律的象形，代表善于音乐的氏族。",
            &["章邯", "章太炎", "章学诚"],
            "章姓主要分布于浙江、江西、安徽三省。",
            118,
            vec![hall("豫章堂", "汉代章平封豫章郡。", "江西")],
        ),
        detailed(
            "向", "Xiàng",
            "向氏源出子姓，为宋国公族之后。春秋时期，宋桓公有子名向父，其后代以王父字为氏。",
            "向姓图腾是窗口向着太阳的方向。",
            &["向秀", "向警予"],
            "向姓主要分布于湖南、湖北、四川等地。",
            99,
            vec![
                hall("河南堂", "向氏发源地之一。", "河南"),
                hall("中和堂", "取致中和之意。", "各地"),
            ],
        ),
    ];

    let common: Vec<SurnameData> = COMMON_SURNAMES
        .iter()
        .filter(|(c, _)| !list.iter().any(|d| d.character == *c))
        .enumerate()
        .map(|(index, (character, pinyin))| SurnameData {
            character: character.to_string(),
            pinyin: pinyin.to_string(),
            origin: format!("{}姓是中国著名姓氏之一，历史悠久，源流众多，多以国为氏或以邑为氏。", character),
            totem_description: Some("暂无详细图腾数据。".to_string()),
            halls: vec![hall(&format!("{}氏宗祠", character), "传统宗祠", "各地")],
            famous_ancestors: Vec::new(),
            distribution: "分布广泛，遍布全国。".to_string(),
            population_rank: Some(index as u32 + 10),
        })
        .collect();
    list.extend(common);
    list
});

pub static REGIONS: Lazy<Vec<Region>> = Lazy::new(|| {
    [
        ("陇西", "甘肃"), ("太原", "山西"), ("绍兴", "浙江"), ("颖川", "河南"),
        ("清河", "河北"), ("彭城", "江苏"), ("琅琊", "山东"), ("弘农", "河南"),
        ("江夏", "湖北"), ("天水", "甘肃"), ("京兆", "陕西"), ("陈留", "河南"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (name, province))| Region {
        id: RegionId(i as u64 + 1),
        name: name.to_string(),
        historical_name: None,
        province: province.to_string(),
        description: None,
    })
    .collect()
});

pub static LI_CLAN: Lazy<ClanInfo> = Lazy::new(|| ClanInfo {
    surname: "李".into(),
    hall_name: "陇西堂".into(),
    origin: "甘肃陇西".into(),
    ancestor: "李利贞".into(),
    motto: "敦孝弟，睦宗族，和乡邻，明礼让，务本业，端士品，隆师道，修坟墓。".into(),
    generation_poem: "国正天心顺，官清民自安，妻贤夫祸少，子孝父心宽。".into(),
});

#[allow(clippy::too_many_arguments)]
fn li(
    id: u64,
    given: &str,
    generation: i32,
    gender: Gender,
    years: (i32, Option<i32>),
    father: Option<u64>,
    spouses: &[&str],
    location: Location,
) -> Person {
    let mut person = Person::new(PersonId(id), "李", given, gender, generation).with_years(years.0, years.1);
    person.generation_name = LI_CLAN
        .generation_name_for(generation)
        .map(String::from)
        .unwrap_or_default();
    person.father_id = father.map(PersonId);
    person.spouses = spouses.iter().map(|s| Reference::unlinked(*s)).collect();
    person.location = Some(location);
    person
}

pub static LI_MEMBERS: Lazy<Vec<Person>> = Lazy::new(|| {
    use Gender::{Female, Male};

    let shaoxing = || Location::new("绍兴", "浙江").at(29.9958, 120.5861);
    let hangzhou = || Location::new("杭州", "浙江").at(30.2741, 120.1551);
    let shanghai = || Location::new("上海", "上海").at(31.2304, 121.4737);
    let kunming = || Location::new("昆明", "云南").at(24.8801, 102.8329);
    let beijing = || Location::new("北京", "北京").at(39.9042, 116.4074);

    let mut members = vec![
        li(1, "崇文", 1, Male, (1850, Some(1910)), None, &["王氏"], shaoxing()),
        li(2, "正道", 2, Male, (1880, Some(1945)), Some(1), &["张氏", "刘氏"], hangzhou()),
        li(3, "正德", 2, Male, (1885, Some(1950)), Some(1), &["陈氏"], shanghai()),
        li(4, "天佑", 3, Male, (1910, Some(1985)), Some(2), &["赵氏"], kunming()),
        li(5, "天赐", 3, Male, (1915, Some(1990)), Some(2), &[], hangzhou()),
        li(6, "婉如", 3, Female, (1920, Some(2000)), Some(2), &["周某"], Location::new("苏州", "江苏").at(31.2989, 120.5853)),
        li(7, "天祥", 3, Male, (1918, Some(1988)), Some(3), &["吴氏"], shanghai()),
        li(8, "心远", 4, Male, (1945, None), Some(4), &["孙氏"], beijing()),
        li(9, "心怡", 4, Female, (1950, None), Some(4), &["郑某"], kunming()),
        li(10, "心诚", 4, Male, (1955, None), Some(7), &["王氏"], shanghai()),
        li(11, "顺之", 5, Male, (1980, None), Some(8), &["钱氏"], beijing()),
        li(12, "顺平", 5, Male, (1985, None), Some(10), &[], Location::new("美国", "海外")),
    ];

    let mothers: &[(usize, &str)] = &[
        (1, "王氏"), (2, "王氏"), (3, "张氏"), (4, "张氏"), (5, "刘氏"),
        (6, "陈氏"), (7, "赵氏"), (8, "赵氏"), (9, "吴氏"), (10, "孙氏"), (11, "王氏"),
    ];
    for (index, mother) in mothers {
        members[*index].mother = Some(Reference::unlinked(*mother));
    }

    members[0].courtesy_name = Some("博古".into());
    members[0].portrait = Some("https://picsum.photos/200/300?grayscale".into());
    members[0].biography = Some("清末秀才，主要负责修缮家族祠堂，定居于江南某镇。".into());
    members[1].courtesy_name = Some("守义".into());
    members[1].portrait = Some("https://picsum.photos/201/301?grayscale".into());
    members[1].biography = Some("早年从商，经营丝绸生意，抗战时期捐资助学。".into());
    members[3].biography = Some("曾任教于西南联大，后回乡教书育人。".into());
    members[7].biography = Some("知名书法家，现居北京。".into());

    rebuild_children(members.iter_mut());
    members
});

pub static LI_EVENTS: Lazy<Vec<ChronicleEvent>> = Lazy::new(|| {
    use EventCategory::*;
    [
        (1850, "始祖诞生", "李崇文公诞生于浙江绍兴书香门第。", Birth),
        (1880, "家族迁徙", "因战乱，家族部分支脉迁往杭州定居。", Migration),
        (1910, "科举停废", "崇文公感叹时局巨变，立下'务本业'之家训。", Achievement),
        (1937, "抗战爆发", "正道公捐出家产支援抗战，家族四散。", Disaster),
        (1949, "新中国成立", "家族成员陆续回乡探亲。", Migration),
    ]
    .into_iter()
    .map(|(year, title, description, category)| ChronicleEvent {
        year,
        title: title.to_string(),
        description: description.to_string(),
        category,
    })
    .collect()
});

/// Recorded ancestor and founder given name for a generic family: the
/// first famous bearer without annotations, surname stripped.
fn founder_names(surname: &SurnameData) -> (String, String) {
    let raw = surname
        .famous_ancestors
        .first()
        .map(String::as_str)
        .unwrap_or("始祖");
    let clean = raw.split('(').next().unwrap_or(raw).trim();
    let given = if clean == surname.character {
        "公"
    } else {
        clean
            .strip_prefix(surname.character.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(clean)
    };
    (clean.to_string(), given.to_string())
}

fn leading_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

/// Registry populated with the reference data and one family book for each
/// of the leading surnames. The 李 book carries the full example lineage.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry.surnames = SURNAMES.clone();
    registry.regions = REGIONS.clone();
    registry.next_region_id = REGIONS.len() as u64 + 1;
    registry.next_person_id = LI_MEMBERS.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;

    let now = Utc::now();
    for (index, surname) in SURNAMES.iter().take(SEEDED_FAMILIES).enumerate() {
        let id = FamilyId(index as u64 + 1);
        let created_at = now - Duration::days(index as i64);

        if surname.character == LI_CLAN.surname {
            registry.families.push(Family {
                id,
                info: LI_CLAN.clone(),
                members: LI_MEMBERS.clone(),
                events: LI_EVENTS.clone(),
                created_at,
            });
            continue;
        }

        let seat = surname
            .halls
            .first()
            .cloned()
            .unwrap_or_else(|| hall(&format!("{}氏宗祠", surname.character), "历史悠久", "中原"));
        let region = seat.region.clone().unwrap_or_else(|| "中原".to_string());
        let (ancestor, given) = founder_names(surname);

        let mut founder = Person::new(
            registry.allocate_person_id(),
            &surname.character,
            &given,
            Gender::Male,
            1,
        )
        .with_years(-200 + index as i32 * 50, None);
        founder.generation_name = FOUNDER_GENERATION_NAME.to_string();
        founder.location = Some(Location::new(&region, &region));
        founder.biography = Some(format!(
            "{}姓始祖，{}...",
            surname.character,
            leading_chars(&surname.origin, 50)
        ));

        registry.families.push(Family {
            id,
            info: ClanInfo {
                surname: surname.character.clone(),
                hall_name: seat.name.clone(),
                origin: region,
                ancestor,
                motto: GENERIC_MOTTO.to_string(),
                generation_poem: GENERIC_POEM.to_string(),
            },
            members: vec![founder],
            events: vec![ChronicleEvent {
                year: 1,
                title: "家族起源".to_string(),
                description: format!(
                    "{}姓起源于{}...",
                    surname.character,
                    leading_chars(&surname.origin, 10)
                ),
                category: EventCategory::Birth,
            }],
            created_at,
        });
    }
    registry.next_family_id = registry.families.len() as u64 + 1;
    registry
}
